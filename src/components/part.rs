//! Body-part identity and layering.
//!
//! Every animated part of a character is an entity carrying a [`Part`], a
//! [`ZIndex`] and an [`AnimationTrack`](super::animation::AnimationTrack).
//! Parts are drawn back to front by `ZIndex`.

use std::sync::Arc;

use bevy_ecs::prelude::Component;

/// Name of the body part an entity renders ("hair_back", "eyes"...).
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Part {
    pub name: Arc<str>,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
        }
    }
}

/// Drawing order of a part. Higher values are drawn on top.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
