//! ECS resources made available to systems.
//!
//! Overview
//! - `charadata` – fixed geometry of the character canvas
//! - `clickreaction` – clip and lines played on a click
//! - `characonfig` – persisted scale, position and window options
//! - `displaylist` – compositor recording the attached clip of each part
//! - `globalmouse` – channel and timer for pointer monitoring outside the window
//! - `messages` – timed message balloon lines
//! - `overlay` – presentation observers anchored to image points
//! - `pointerinput` – per-frame pointer state
//! - `presentation` – zoom/drag controller owning the coordinate transform
//! - `texturestore` – frame textures keyed by frame identifier
//! - `transform` – image/scene/screen coordinate mapping
//! - `worldtime` – frame clock
pub mod characonfig;
pub mod charadata;
pub mod clickreaction;
pub mod displaylist;
pub mod globalmouse;
pub mod messages;
pub mod overlay;
pub mod pointerinput;
pub mod presentation;
pub mod texturestore;
pub mod transform;
pub mod worldtime;
