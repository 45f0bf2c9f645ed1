//! Overlays anchored to image-space points.
//!
//! Overlays (status bar, input box, message panel) follow the character
//! around the screen. They register with the
//! [`PresentationController`](crate::resources::presentation::PresentationController)
//! as [`PresentationObserver`]s and are told to recompute their placement
//! after every committed scale or move, in registration order.

use raylib::prelude::{Rectangle, Vector2};

use crate::resources::charadata::CharaData;
use crate::resources::transform::CoordinateTransform;

pub const BAR_WIDTH: f32 = 120.0;
pub const BAR_HEIGHT: f32 = 8.0;
pub const INPUT_WIDTH: f32 = 160.0;
pub const INPUT_HEIGHT: f32 = 24.0;
pub const INPUT_MARGIN_BOTTOM: f32 = 10.0;
/// How far above the input box the pointer may be for it to show.
pub const INPUT_SHOW_Y_DELTA: f32 = 40.0;
pub const MSG_PANEL_WIDTH: f32 = 220.0;
pub const MSG_PANEL_HEIGHT: f32 = 120.0;

/// What triggered a relayout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationChange {
    /// Scale ratio changed (zoom).
    Resized,
    /// Window translated (drag).
    Moved,
    /// Scale and position applied from persisted state.
    Restored,
}

/// Read-only snapshot handed to observers.
pub struct PresentationView<'a> {
    pub transform: &'a CoordinateTransform,
    /// Bounds of the screen currently showing the window.
    pub screen: Rectangle,
}

/// Coordinate space of an [`OverlayPlacement`] rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlaySpace {
    Scene,
    Screen,
}

/// Side the message panel's tail points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointing {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct OverlayPlacement {
    pub name: &'static str,
    pub space: OverlaySpace,
    pub rect: Rectangle,
    pub visible: bool,
    pub pointing: Option<Pointing>,
}

/// Listener notified synchronously after each committed presentation change.
pub trait PresentationObserver: Send + Sync {
    /// Recompute placement from the current transform.
    fn relayout(&mut self, change: PresentationChange, view: &PresentationView<'_>);

    /// Pointer hover in scene space; `None` once the pointer left the window.
    fn pointer_moved(&mut self, _scene: Option<Vector2>, _view: &PresentationView<'_>) {}

    /// Where the host should draw this overlay, if it draws anything.
    fn placement(&self) -> Option<OverlayPlacement> {
        None
    }
}

/// Status indicators centred on the image's top-middle point.
///
/// Shown while the pointer hovers the reserved band above the image.
#[derive(Debug, Clone)]
pub struct StatusBarOverlay {
    anchor_x: f32,
    width: f32,
    height: f32,
    rect: Rectangle,
    visible: bool,
}

impl StatusBarOverlay {
    pub fn new(data: &CharaData) -> Self {
        Self::with_size(data.top_middle_x, BAR_WIDTH, BAR_HEIGHT)
    }

    pub fn with_size(anchor_x: f32, width: f32, height: f32) -> Self {
        Self {
            anchor_x,
            width,
            height,
            rect: Rectangle {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            visible: false,
        }
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl PresentationObserver for StatusBarOverlay {
    fn relayout(&mut self, _change: PresentationChange, view: &PresentationView<'_>) {
        let middle = view.transform.image_to_scene_x(self.anchor_x);
        self.rect.x = middle - self.width / 2.0;
        self.rect.y = 0.0;
        self.rect.height = self.height;
    }

    fn pointer_moved(&mut self, scene: Option<Vector2>, view: &PresentationView<'_>) {
        self.visible = match scene {
            Some(p) => p.y < view.transform.extra_top().max(self.height),
            None => false,
        };
    }

    fn placement(&self) -> Option<OverlayPlacement> {
        Some(OverlayPlacement {
            name: "status_bar",
            space: OverlaySpace::Scene,
            rect: self.rect,
            visible: self.visible,
            pointing: None,
        })
    }
}

/// Text input affordance centred on the image's bottom-middle point.
#[derive(Debug, Clone)]
pub struct InputBoxOverlay {
    anchor_x: f32,
    width: f32,
    height: f32,
    enabled: bool,
    rect: Rectangle,
    visible: bool,
}

impl InputBoxOverlay {
    pub fn new(data: &CharaData, enabled: bool) -> Self {
        Self {
            anchor_x: data.bottom_middle_x,
            width: INPUT_WIDTH,
            height: INPUT_HEIGHT,
            enabled,
            rect: Rectangle {
                x: 0.0,
                y: 0.0,
                width: INPUT_WIDTH,
                height: INPUT_HEIGHT,
            },
            visible: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.visible = false;
        }
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl PresentationObserver for InputBoxOverlay {
    fn relayout(&mut self, _change: PresentationChange, view: &PresentationView<'_>) {
        let middle = view.transform.image_to_scene_x(self.anchor_x);
        self.rect.x = middle - self.width / 2.0;
        self.rect.y = view.transform.height() - INPUT_MARGIN_BOTTOM - self.height;
    }

    fn pointer_moved(&mut self, scene: Option<Vector2>, _view: &PresentationView<'_>) {
        self.visible = match scene {
            Some(p) if self.enabled => p.y > self.rect.y - INPUT_SHOW_Y_DELTA,
            _ => false,
        };
    }

    fn placement(&self) -> Option<OverlayPlacement> {
        Some(OverlayPlacement {
            name: "input_box",
            space: OverlaySpace::Scene,
            rect: self.rect,
            visible: self.visible,
            pointing: None,
        })
    }
}

/// Floating message balloon beside the character's head, in screen space.
///
/// Points towards the character from whichever side has more room on the
/// current screen.
#[derive(Debug, Clone)]
pub struct MessagePanelOverlay {
    anchor_x: f32,
    anchor_y: f32,
    offset_x: f32,
    rect: Rectangle,
    pointing: Pointing,
}

impl MessagePanelOverlay {
    pub fn new(data: &CharaData) -> Self {
        Self {
            anchor_x: data.top_middle_x,
            anchor_y: data.message_at_min_y,
            offset_x: data.message_offset_x,
            rect: Rectangle {
                x: 0.0,
                y: 0.0,
                width: MSG_PANEL_WIDTH,
                height: MSG_PANEL_HEIGHT,
            },
            pointing: Pointing::Left,
        }
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn pointing(&self) -> Pointing {
        self.pointing
    }
}

impl PresentationObserver for MessagePanelOverlay {
    fn relayout(&mut self, _change: PresentationChange, view: &PresentationView<'_>) {
        let t = view.transform;
        let middle = t.scene_to_screen_x(t.image_to_scene_x(self.anchor_x));
        let screen_mid = view.screen.x + view.screen.width / 2.0;
        self.pointing = if middle > screen_mid {
            Pointing::Right
        } else {
            Pointing::Left
        };

        let offset = self.offset_x * t.scale_ratio();
        self.rect.x = match self.pointing {
            Pointing::Right => middle - offset - self.rect.width,
            Pointing::Left => middle + offset,
        };
        self.rect.y = t.scene_to_screen_y(t.image_to_scene_y(self.anchor_y));
    }

    fn placement(&self) -> Option<OverlayPlacement> {
        Some(OverlayPlacement {
            name: "message_panel",
            space: OverlaySpace::Screen,
            rect: self.rect,
            visible: true,
            pointing: Some(self.pointing),
        })
    }
}
