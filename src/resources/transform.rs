//! Coordinate mapping between image, scene and screen space.
//!
//! - **Image space**: pixels of the unscaled character canvas, origin at the
//!   canvas top-left, crop not applied.
//! - **Scene space**: pixels inside the window, after cropping and scaling,
//!   with `extra_top` pixels reserved above the image.
//! - **Screen space**: absolute desktop pixels, `screen = scene + window`.
//!
//! [`CoordinateTransform`] is pure math. It tracks where the window should be
//! and how large it should be; pushing those values to the OS window is the
//! job of the [`PresentationController`](crate::resources::presentation::PresentationController).

use bevy_ecs::prelude::Resource;
use log::debug;
use raylib::prelude::{Rectangle, Vector2};

use crate::error::CharaError;
use crate::resources::charadata::CharaData;

/// Pixels trimmed from each edge of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Crop {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CoordinateTransform {
    original_width: f32,
    original_height: f32,
    crop: Crop,
    extra_top: f32,
    scale_ratio: f32,
    window_x: f32,
    window_y: f32,
}

fn check_ratio(ratio: f32) -> Result<(), CharaError> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(CharaError::InvalidRatio(ratio))
    }
}

impl CoordinateTransform {
    /// Create a transform at ratio 1 with the window at the screen origin.
    pub fn new(
        original_width: f32,
        original_height: f32,
        crop: Crop,
        extra_top: f32,
    ) -> Result<Self, CharaError> {
        if original_width - crop.left - crop.right <= 0.0
            || original_height - crop.top - crop.bottom <= 0.0
        {
            return Err(CharaError::InvalidGeometry(format!(
                "crop {:?} leaves nothing of {}x{}",
                crop, original_width, original_height
            )));
        }
        if [crop.left, crop.right, crop.top, crop.bottom, extra_top]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(CharaError::InvalidGeometry(format!(
                "negative margins {:?} / extra top {}",
                crop, extra_top
            )));
        }
        Ok(Self {
            original_width,
            original_height,
            crop,
            extra_top,
            scale_ratio: 1.0,
            window_x: 0.0,
            window_y: 0.0,
        })
    }

    /// Build the transform for a character's canvas.
    pub fn from_data(data: &CharaData, extra_top: f32) -> Result<Self, CharaError> {
        data.validate()?;
        Self::new(
            data.image_width,
            data.image_height,
            Crop {
                left: data.cut_left(),
                right: data.cut_right(),
                top: data.cut_top(),
                bottom: data.cut_bottom(),
            },
            extra_top,
        )
    }

    pub fn original_width(&self) -> f32 {
        self.original_width
    }

    pub fn original_height(&self) -> f32 {
        self.original_height
    }

    pub fn crop(&self) -> Crop {
        self.crop
    }

    pub fn extra_top(&self) -> f32 {
        self.extra_top
    }

    pub fn scale_ratio(&self) -> f32 {
        self.scale_ratio
    }

    pub fn window_x(&self) -> f32 {
        self.window_x
    }

    pub fn window_y(&self) -> f32 {
        self.window_y
    }

    pub fn position(&self) -> Vector2 {
        Vector2 {
            x: self.window_x,
            y: self.window_y,
        }
    }

    /// Window width: the cropped canvas width at the current ratio.
    pub fn width(&self) -> f32 {
        (self.original_width - self.crop.left - self.crop.right) * self.scale_ratio
    }

    /// Window height: the cropped canvas height at the current ratio plus
    /// the reserved top band.
    pub fn height(&self) -> f32 {
        (self.original_height - self.crop.top - self.crop.bottom) * self.scale_ratio
            + self.extra_top
    }

    /// Window rectangle in screen space.
    pub fn bounds(&self) -> Rectangle {
        Rectangle {
            x: self.window_x,
            y: self.window_y,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Whether a scene point lies on the window (edges included).
    pub fn contains_scene(&self, scene: Vector2) -> bool {
        scene.x >= 0.0 && scene.x <= self.width() && scene.y >= 0.0 && scene.y <= self.height()
    }

    pub fn scene_to_image_x(&self, scene_x: f32) -> f32 {
        scene_x / self.scale_ratio + self.crop.left
    }

    pub fn scene_to_image_y(&self, scene_y: f32) -> f32 {
        (scene_y - self.extra_top) / self.scale_ratio + self.crop.top
    }

    pub fn image_to_scene_x(&self, image_x: f32) -> f32 {
        (image_x - self.crop.left) * self.scale_ratio
    }

    pub fn image_to_scene_y(&self, image_y: f32) -> f32 {
        (image_y - self.crop.top) * self.scale_ratio + self.extra_top
    }

    pub fn screen_to_scene_x(&self, screen_x: f32) -> f32 {
        screen_x - self.window_x
    }

    pub fn screen_to_scene_y(&self, screen_y: f32) -> f32 {
        screen_y - self.window_y
    }

    pub fn scene_to_screen_x(&self, scene_x: f32) -> f32 {
        scene_x + self.window_x
    }

    pub fn scene_to_screen_y(&self, scene_y: f32) -> f32 {
        scene_y + self.window_y
    }

    pub fn scene_to_image(&self, scene: Vector2) -> Vector2 {
        Vector2 {
            x: self.scene_to_image_x(scene.x),
            y: self.scene_to_image_y(scene.y),
        }
    }

    pub fn image_to_scene(&self, image: Vector2) -> Vector2 {
        Vector2 {
            x: self.image_to_scene_x(image.x),
            y: self.image_to_scene_y(image.y),
        }
    }

    pub fn screen_to_scene(&self, screen: Vector2) -> Vector2 {
        Vector2 {
            x: self.screen_to_scene_x(screen.x),
            y: self.screen_to_scene_y(screen.y),
        }
    }

    pub fn scene_to_screen(&self, scene: Vector2) -> Vector2 {
        Vector2 {
            x: self.scene_to_screen_x(scene.x),
            y: self.scene_to_screen_y(scene.y),
        }
    }

    pub fn image_to_screen(&self, image: Vector2) -> Vector2 {
        self.scene_to_screen(self.image_to_scene(image))
    }

    pub fn screen_to_image(&self, screen: Vector2) -> Vector2 {
        self.scene_to_image(self.screen_to_scene(screen))
    }

    /// Rescale so that the image point `(anchor_x, anchor_y)` keeps its
    /// screen position.
    ///
    /// The window moves by the difference between the anchor's scene
    /// position under the old and the new ratio. Fails without touching any
    /// field when `ratio` is not a positive finite number.
    pub fn scale_at(&mut self, anchor_x: f32, anchor_y: f32, ratio: f32) -> Result<(), CharaError> {
        check_ratio(ratio)?;
        debug!("scale_at({},{},{})", anchor_x, anchor_y, ratio);

        let old_x = (anchor_x - self.crop.left) * self.scale_ratio;
        let old_y = (anchor_y - self.crop.top) * self.scale_ratio;
        let new_x = (anchor_x - self.crop.left) * ratio;
        let new_y = (anchor_y - self.crop.top) * ratio;
        self.window_x += old_x - new_x;
        self.window_y += old_y - new_y;
        self.scale_ratio = ratio;

        debug!(
            "scale_at::[{},{}]+({},{})",
            self.width(),
            self.height(),
            self.window_x,
            self.window_y
        );
        Ok(())
    }

    /// Rescale anchored at the top-left visible corner of the image.
    pub fn scale(&mut self, ratio: f32) -> Result<(), CharaError> {
        self.scale_at(self.crop.left, self.crop.top, ratio)
    }

    /// Translate the window by a screen-space delta.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.window_x += dx;
        self.window_y += dy;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.window_x = x;
        self.window_y = y;
    }

    /// Place the window centre at the centre of `screen`.
    pub fn center_in(&mut self, screen: Rectangle) {
        let center_x = self.window_x + self.width() / 2.0;
        let center_y = self.window_y + self.height() / 2.0;
        let screen_center_x = screen.x + screen.width / 2.0;
        let screen_center_y = screen.y + screen.height / 2.0;
        self.move_by(screen_center_x - center_x, screen_center_y - center_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::charadata::sample_data;

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(
            1000.0,
            1500.0,
            Crop {
                left: 50.0,
                right: 30.0,
                top: 0.0,
                bottom: 100.0,
            },
            20.0,
        )
        .unwrap()
    }

    #[test]
    fn test_initial_size_is_cropped_canvas() {
        let t = transform();
        assert!(approx_eq(t.width(), 920.0));
        assert!(approx_eq(t.height(), 1420.0));
        assert!(approx_eq(t.scale_ratio(), 1.0));
    }

    #[test]
    fn test_crop_swallowing_canvas_rejected() {
        let crop = Crop {
            left: 600.0,
            right: 400.0,
            top: 0.0,
            bottom: 0.0,
        };
        assert!(CoordinateTransform::new(1000.0, 1500.0, crop, 0.0).is_err());
    }

    #[test]
    fn test_from_data_uses_bounds_as_crop() {
        let t = CoordinateTransform::from_data(&sample_data(), 0.0).unwrap();
        assert_eq!(t.crop().left, 50.0);
        assert_eq!(t.crop().bottom, 100.0);
        assert!(approx_eq(t.width(), 900.0));
    }

    #[test]
    fn test_scene_x_of_image_point() {
        let mut t = CoordinateTransform::new(
            1000.0,
            1500.0,
            Crop {
                left: 50.0,
                ..Crop::default()
            },
            0.0,
        )
        .unwrap();
        t.scale(0.5).unwrap();
        assert!(approx_eq(t.image_to_scene_x(150.0), 50.0));
    }

    #[test]
    fn test_round_trip_image_scene() {
        let mut t = transform();
        for ratio in [0.1_f32, 0.37, 1.0, 2.5] {
            t.scale_at(400.0, 700.0, ratio).unwrap();
            t.set_position(-300.0, 1200.0);
            for (x, y) in [(0.0, 0.0), (50.0, 0.0), (123.4, 987.6), (1000.0, 1500.0)] {
                assert!(approx_eq(t.scene_to_image_x(t.image_to_scene_x(x)), x));
                assert!(approx_eq(t.scene_to_image_y(t.image_to_scene_y(y)), y));
            }
        }
    }

    #[test]
    fn test_round_trip_screen_image() {
        let mut t = transform();
        t.scale(0.42).unwrap();
        t.set_position(1500.0, 80.0);
        let p = Vector2 { x: 321.0, y: 654.0 };
        let back = t.screen_to_image(t.image_to_screen(p));
        assert!(approx_eq(back.x, p.x));
        assert!(approx_eq(back.y, p.y));
    }

    #[test]
    fn test_scale_at_keeps_anchor_on_screen() {
        let mut t = transform();
        t.scale(0.8).unwrap();
        t.set_position(100.0, 200.0);
        let anchor = Vector2 { x: 420.0, y: 610.0 };
        let before = t.image_to_screen(anchor);

        t.scale_at(anchor.x, anchor.y, 1.3).unwrap();
        let after = t.image_to_screen(anchor);
        assert!(approx_eq(before.x, after.x));
        assert!(approx_eq(before.y, after.y));
        assert!(approx_eq(t.scale_ratio(), 1.3));
        assert!(approx_eq(t.width(), 920.0 * 1.3));
        assert!(approx_eq(t.height(), 1400.0 * 1.3 + 20.0));
    }

    #[test]
    fn test_scale_keeps_top_left_crop_corner() {
        let mut t = transform();
        t.set_position(10.0, 10.0);
        t.scale(0.5).unwrap();
        assert!(approx_eq(t.window_x(), 10.0));
        assert!(approx_eq(t.window_y(), 10.0));
    }

    #[test]
    fn test_invalid_ratio_leaves_transform_untouched() {
        let mut t = transform();
        t.set_position(5.0, 6.0);
        let before = t.clone();
        assert_eq!(t.scale_at(1.0, 1.0, 0.0), Err(CharaError::InvalidRatio(0.0)));
        assert!(t.scale(-2.0).is_err());
        assert!(t.scale(f32::INFINITY).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn test_move_changes_screen_mapping_only() {
        let mut t = CoordinateTransform::new(
            1000.0,
            1500.0,
            Crop {
                left: 50.0,
                ..Crop::default()
            },
            0.0,
        )
        .unwrap();
        t.scale(0.5).unwrap();
        t.set_position(300.0, 400.0);
        let screen = Vector2 { x: 360.0, y: 450.0 };
        let image_before = t.screen_to_image(screen);
        let scene_of_image = t.image_to_scene_x(150.0);

        t.move_by(20.0, -10.0);
        assert!(approx_eq(t.window_x(), 320.0));
        assert!(approx_eq(t.window_y(), 390.0));
        let image_after = t.screen_to_image(screen);
        assert!(approx_eq(image_after.x, image_before.x - 40.0));
        assert!(approx_eq(image_after.y, image_before.y + 20.0));
        assert!(approx_eq(t.image_to_scene_x(150.0), scene_of_image));
    }

    #[test]
    fn test_center_in_screen() {
        let mut t = transform();
        t.scale(0.5).unwrap();
        let screen = Rectangle {
            x: 1920.0,
            y: 0.0,
            width: 1280.0,
            height: 1024.0,
        };
        t.center_in(screen);
        assert!(approx_eq(t.window_x() + t.width() / 2.0, 2560.0));
        assert!(approx_eq(t.window_y() + t.height() / 2.0, 512.0));
    }

    #[test]
    fn test_contains_scene_edges() {
        let t = transform();
        assert!(t.contains_scene(Vector2 { x: 0.0, y: 0.0 }));
        assert!(t.contains_scene(Vector2 {
            x: t.width(),
            y: t.height()
        }));
        assert!(!t.contains_scene(Vector2 { x: -0.5, y: 3.0 }));
    }
}
