//! Crate-wide error type.
//!
//! Every fallible operation of the animation and presentation core reports a
//! [`CharaError`]. Validation always happens before any field is touched, so
//! an `Err` means the target value is unchanged.

use thiserror::Error;

/// Errors raised by clip construction, clip switching, transform updates and
/// character loading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CharaError {
    /// `trigger`/`queue` referenced a clip the track does not own.
    #[error("track '{track}' has no clip named '{clip}'")]
    UnknownClip { track: String, clip: String },
    /// A clip was built with an empty frame sequence.
    #[error("clip '{clip}' has no frames")]
    DegenerateClip { clip: String },
    /// A clip was built with a non-positive or non-finite frame rate.
    #[error("clip '{clip}' has an invalid frame rate {fps}")]
    InvalidFrameRate { clip: String, fps: f32 },
    /// A non-positive or non-finite scale ratio reached the transform.
    #[error("invalid scale ratio {0}")]
    InvalidRatio(f32),
    /// Image dimensions or crop margins do not describe a visible area.
    #[error("invalid character geometry: {0}")]
    InvalidGeometry(String),
    /// The character definition could not be read or parsed.
    #[error("invalid character definition: {0}")]
    Definition(String),
}
