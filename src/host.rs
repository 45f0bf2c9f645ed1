//! Contracts between the character core and the rendering host.
//!
//! The core never touches a display tree or an OS window directly. Instead it
//! talks to three small traits implemented by whoever hosts the character:
//!
//! - [`Compositor`] – attach/detach the visual node of a clip for a part
//! - [`HostWindow`] – resize/move the window and describe the screens
//! - [`GlobalPointerHook`] – start/stop a pointer monitor that reports
//!   positions while the pointer is outside the window
//!
//! [`HostWindow`] is implemented for [`raylib::RaylibHandle`] so the binary
//! can hand its handle straight to the presentation systems.

use crossbeam_channel::Sender;
use raylib::ffi;
use raylib::prelude::{Rectangle, Vector2};

use crate::components::frameclip::FrameClip;
use crate::resources::globalmouse::GlobalPointerEvent;

/// Screen used when the host cannot enumerate any monitor.
pub const FALLBACK_SCREEN: Rectangle = Rectangle {
    x: 0.0,
    y: 0.0,
    width: 1920.0,
    height: 1080.0,
};

/// Display-tree binding used by [`AnimationTrack`](crate::components::animation::AnimationTrack)
/// on clip transitions.
pub trait Compositor {
    /// Start rendering `clip` for `part`.
    fn attach(&mut self, part: &str, clip: &FrameClip);

    /// Stop rendering `clip` for `part`.
    fn detach(&mut self, part: &str, clip: &FrameClip);

    /// Replace the attached clip of `part` in one call.
    ///
    /// Hosts whose display tree supports an atomic replace should override
    /// this; the default detaches first and attaches second.
    fn swap(&mut self, part: &str, old: Option<&FrameClip>, new: &FrameClip) {
        if let Some(old) = old {
            self.detach(part, old);
        }
        self.attach(part, new);
    }
}

/// Window primitive consumed by the presentation controller.
pub trait HostWindow {
    /// Set the window size in screen pixels.
    fn resize_window(&mut self, width: f32, height: f32);

    /// Set the absolute position of the window's top-left corner.
    fn move_window(&mut self, x: f32, y: f32);

    /// Bounds of every connected screen, primary first.
    fn screen_bounds(&self) -> Vec<Rectangle>;

    /// Bounds of the screen containing `point`, if any.
    fn screen_bounds_containing(&self, point: Vector2) -> Option<Rectangle> {
        self.screen_bounds()
            .into_iter()
            .find(|b| rect_contains(b, point))
    }

    /// Bounds of the primary screen.
    fn primary_screen_bounds(&self) -> Rectangle {
        self.screen_bounds()
            .first()
            .copied()
            .unwrap_or(FALLBACK_SCREEN)
    }
}

/// OS-level pointer monitor active while the pointer is outside the window.
///
/// Implementations may run on any thread; they only push
/// [`GlobalPointerEvent`]s into the sender handed to [`enable`](Self::enable).
/// The events are drained on the rendering thread.
pub trait GlobalPointerHook {
    fn enable(&mut self, tx: Sender<GlobalPointerEvent>);
    fn disable(&mut self);
}

/// Half-open containment test (`x <= p < x + width`).
pub fn rect_contains(rect: &Rectangle, point: Vector2) -> bool {
    point.x >= rect.x
        && point.x < rect.x + rect.width
        && point.y >= rect.y
        && point.y < rect.y + rect.height
}

impl HostWindow for raylib::RaylibHandle {
    fn resize_window(&mut self, width: f32, height: f32) {
        self.set_window_size(width.round() as i32, height.round() as i32);
    }

    fn move_window(&mut self, x: f32, y: f32) {
        self.set_window_position(x.round() as i32, y.round() as i32);
    }

    fn screen_bounds(&self) -> Vec<Rectangle> {
        let count = unsafe { ffi::GetMonitorCount() };
        (0..count)
            .map(|monitor| {
                let pos = unsafe { ffi::GetMonitorPosition(monitor) };
                let width = unsafe { ffi::GetMonitorWidth(monitor) };
                let height = unsafe { ffi::GetMonitorHeight(monitor) };
                Rectangle {
                    x: pos.x,
                    y: pos.y,
                    width: width as f32,
                    height: height as f32,
                }
            })
            .collect()
    }
}
