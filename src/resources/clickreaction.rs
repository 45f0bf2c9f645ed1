//! What the character does when it is clicked.

use bevy_ecs::prelude::Resource;

/// Clip played on a part when the character is clicked.
pub const REACT_CLIP: &str = "react";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ClickReaction {
    /// Played once on every part that has it, then the previous clip resumes.
    pub clip: String,
    /// Shown in the message panel, one line after another.
    pub lines: Vec<String>,
}

impl Default for ClickReaction {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ClickReaction {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            clip: REACT_CLIP.to_string(),
            lines,
        }
    }
}
