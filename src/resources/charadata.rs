//! Fixed geometry of a character asset.
//!
//! [`CharaData`] describes the sprite canvas every part is drawn on: its full
//! size, the visible bounds (everything outside them is cropped from the
//! window) and the image-space anchor points overlays attach to.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::CharaError;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharaData {
    /// Full canvas width in image pixels.
    pub image_width: f32,
    /// Full canvas height in image pixels.
    pub image_height: f32,
    /// Smallest allowed on-screen width of the full canvas.
    pub min_width: f32,
    /// On-screen width of the full canvas on first start.
    pub initial_width: f32,
    /// Visible bounds, image space.
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Horizontal anchor of the status bar.
    pub top_middle_x: f32,
    /// Horizontal anchor of the input box.
    pub bottom_middle_x: f32,
    /// Horizontal distance between the message panel and `top_middle_x`.
    pub message_offset_x: f32,
    /// Vertical anchor of the message panel.
    pub message_at_min_y: f32,
    #[serde(default)]
    pub message_supported: bool,
}

impl CharaData {
    /// Check that the visible bounds describe a non-empty area inside the
    /// canvas and that the size limits are usable.
    pub fn validate(&self) -> Result<(), CharaError> {
        let finite = [
            self.image_width,
            self.image_height,
            self.min_width,
            self.initial_width,
            self.min_x,
            self.max_x,
            self.min_y,
            self.max_y,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(CharaError::InvalidGeometry(
                "non-finite dimension".to_string(),
            ));
        }
        if self.image_width <= 0.0 || self.image_height <= 0.0 {
            return Err(CharaError::InvalidGeometry(format!(
                "image size {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.min_x < 0.0 || self.max_x > self.image_width || self.min_x >= self.max_x {
            return Err(CharaError::InvalidGeometry(format!(
                "horizontal bounds {}..{} outside 0..{}",
                self.min_x, self.max_x, self.image_width
            )));
        }
        if self.min_y < 0.0 || self.max_y > self.image_height || self.min_y >= self.max_y {
            return Err(CharaError::InvalidGeometry(format!(
                "vertical bounds {}..{} outside 0..{}",
                self.min_y, self.max_y, self.image_height
            )));
        }
        if self.min_width <= 0.0 || self.initial_width <= 0.0 {
            return Err(CharaError::InvalidGeometry(format!(
                "min width {} / initial width {}",
                self.min_width, self.initial_width
            )));
        }
        Ok(())
    }

    pub fn cut_left(&self) -> f32 {
        self.min_x
    }

    pub fn cut_right(&self) -> f32 {
        self.image_width - self.max_x
    }

    pub fn cut_top(&self) -> f32 {
        self.min_y
    }

    pub fn cut_bottom(&self) -> f32 {
        self.image_height - self.max_y
    }
}

#[cfg(test)]
pub(crate) fn sample_data() -> CharaData {
    CharaData {
        image_width: 1000.0,
        image_height: 1500.0,
        min_width: 200.0,
        initial_width: 500.0,
        min_x: 50.0,
        max_x: 950.0,
        min_y: 0.0,
        max_y: 1400.0,
        top_middle_x: 500.0,
        bottom_middle_x: 480.0,
        message_offset_x: 120.0,
        message_at_min_y: 300.0,
        message_supported: true,
    }
}
