//! ECS components for character parts.
//!
//! Submodules overview:
//! - [`animation`] – per-part clip set and playback cursor
//! - [`frameclip`] – immutable named frame sequence played at a fixed rate
//! - [`part`] – part name and drawing order

pub mod animation;
pub mod frameclip;
pub mod part;
