//! Systems run once per frame.
//!
//! Submodules overview
//! - [`animation`] – tick every animation track
//! - [`globalmouse`] – hover handling and the global pointer hook
//! - [`input`] – read raylib pointer input into [`crate::resources::pointerinput::PointerInput`]
//! - [`messages`] – reveal and expire message lines
//! - [`presentation`] – zoom and drag gestures
//! - [`render`] – draw parts and overlays with raylib
//! - [`time`] – update the frame clock

pub mod animation;
pub mod globalmouse;
pub mod input;
pub mod messages;
pub mod presentation;
pub mod render;
pub mod time;
