//! Immutable frame sequences.
//!
//! A [`FrameClip`] is the leaf data of the animation engine: a named, ordered
//! list of frame identifiers played back at a fixed rate. Frame identifiers
//! are opaque handles (usually asset paths) that the host resolves to images.

use std::sync::Arc;

use crate::error::CharaError;

/// Default playback rate used by character definitions that omit `fps`.
pub const DEFAULT_FPS: f32 = 30.0;

/// Opaque frame handle resolved by the host's asset loader.
pub type FrameId = Arc<str>;

/// Named, immutable sequence of frames with its playback rate.
///
/// The first frame doubles as the rest pose shown while the clip is attached
/// but not advancing.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClip {
    name: Arc<str>,
    frames: Arc<[FrameId]>,
    fps: f32,
}

impl FrameClip {
    /// Build a clip, rejecting empty frame lists and unusable frame rates.
    pub fn new<I, S>(name: impl Into<String>, frames: I, fps: f32) -> Result<Self, CharaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name: String = name.into();
        let frames: Vec<FrameId> = frames
            .into_iter()
            .map(|f| {
                let f: String = f.into();
                FrameId::from(f)
            })
            .collect();
        if frames.is_empty() {
            return Err(CharaError::DegenerateClip { clip: name });
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CharaError::InvalidFrameRate { clip: name, fps });
        }
        Ok(Self {
            name: Arc::from(name),
            frames: frames.into(),
            fps,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Number of frames, always at least one.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Seconds each frame stays on screen.
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.fps
    }

    /// The rest pose.
    pub fn first_frame(&self) -> &FrameId {
        &self.frames[0]
    }

    /// Frame at `index`, wrapping around the sequence length.
    pub fn frame(&self, index: usize) -> &FrameId {
        &self.frames[index % self.frames.len()]
    }
}

/// Expand a numbered frame sequence: `prefix` + three-digit index + `suffix`
/// for every index in `start..end`.
///
/// `build_seq_names("dress_", 0, 3, ".png")` yields `dress_000.png`,
/// `dress_001.png`, `dress_002.png`.
pub fn build_seq_names(prefix: &str, start: u32, end: u32, suffix: &str) -> Vec<String> {
    (start..end)
        .map(|i| format!("{}{:03}{}", prefix, i, suffix))
        .collect()
}
