//! Event types and observers.
//!
//! Submodules:
//! - [`clip`] – clip switch requests for a part
//! - [`message`] – message balloon requests
//! - [`presentation`] – presentation changes, completed gestures and clicks
//! - [`reaction`] – clip and message played when the character is clicked
pub mod clip;
pub mod message;
pub mod presentation;
pub mod reaction;
