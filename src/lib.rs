//! Desktop character library.
//!
//! This module exposes the animation core, the presentation controller and
//! the ECS glue around them for the binary and for integration tests.

pub mod chara;
pub mod components;
pub mod error;
pub mod events;
pub mod host;
pub mod resources;
pub mod systems;
