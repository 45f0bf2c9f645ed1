//! Gesture-driven presentation of the character window.
//!
//! [`PresentationController`] owns the [`CoordinateTransform`] and is the
//! only place where the scale ratio or window position changes. Every
//! committed change is pushed to the host window and then fanned out to the
//! registered [`PresentationObserver`]s in registration order.

use bevy_ecs::prelude::Resource;
use log::{debug, info};
use raylib::prelude::{Rectangle, Vector2};
use smallvec::SmallVec;

use crate::error::CharaError;
use crate::host::HostWindow;
use crate::resources::charadata::CharaData;
use crate::resources::overlay::{
    OverlayPlacement, PresentationChange, PresentationObserver, PresentationView,
};
use crate::resources::transform::CoordinateTransform;

/// Ratio change per wheel notch.
pub const ZOOM_STEP: f32 = 0.01;
/// Ratios closer than this are considered equal.
pub const RATIO_EPSILON: f32 = 0.0001;
/// The window may grow slightly past the screen it sits on.
pub const SCREEN_OVERSIZE: f32 = 1.1;

/// Host-derived bounds for the on-screen size of the full canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationLimits {
    pub min_width: f32,
    pub max_width: f32,
    pub max_height: f32,
}

impl PresentationLimits {
    /// Largest canvas size that fits any of `screens`.
    ///
    /// Per screen the bounds are enlarged by [`SCREEN_OVERSIZE`], capped at
    /// the image size and shrunk to the image aspect ratio.
    pub fn from_screens(data: &CharaData, screens: &[Rectangle]) -> Self {
        let aspect = data.image_width / data.image_height;
        let mut max_width = 0.0_f32;
        let mut max_height = 0.0_f32;
        for screen in screens {
            let mut w = (screen.width * SCREEN_OVERSIZE).min(data.image_width);
            let mut h = (screen.height * SCREEN_OVERSIZE).min(data.image_height);
            if w / h > aspect {
                w = h * aspect;
            } else {
                h = w / aspect;
            }
            if w > max_width {
                max_width = w;
                max_height = h;
            }
        }
        if max_width <= 0.0 {
            max_width = data.image_width;
            max_height = data.image_height;
        }
        Self {
            min_width: data.min_width.min(max_width),
            max_width,
            max_height,
        }
    }
}

/// Scale and position as stored between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PersistedPresentation {
    pub ratio: Option<f32>,
    pub position: Option<Vector2>,
}

#[derive(Resource)]
pub struct PresentationController {
    transform: CoordinateTransform,
    limits: PresentationLimits,
    initial_width: f32,
    zoom_step: f32,
    draggable: bool,
    drag_last: Option<Vector2>,
    drag_moved: bool,
    last_screen: Option<Rectangle>,
    observers: SmallVec<[Box<dyn PresentationObserver>; 4]>,
}

impl PresentationController {
    pub fn new(
        transform: CoordinateTransform,
        limits: PresentationLimits,
        initial_width: f32,
    ) -> Self {
        Self {
            transform,
            limits,
            initial_width,
            zoom_step: ZOOM_STEP,
            draggable: true,
            drag_last: None,
            drag_moved: false,
            last_screen: None,
            observers: SmallVec::new(),
        }
    }

    /// Build from character geometry with limits computed from `screens`.
    pub fn from_data(
        data: &CharaData,
        extra_top: f32,
        screens: &[Rectangle],
    ) -> Result<Self, CharaError> {
        data.validate()?;
        let transform = CoordinateTransform::from_data(data, extra_top)?;
        let limits = PresentationLimits::from_screens(data, screens);
        Ok(Self::new(transform, limits, data.initial_width))
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn limits(&self) -> PresentationLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: PresentationLimits) {
        self.limits = limits;
    }

    /// Ratio change per wheel notch. Must be positive.
    pub fn set_zoom_step(&mut self, step: f32) -> Result<(), CharaError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(CharaError::InvalidRatio(step));
        }
        self.zoom_step = step;
        Ok(())
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
        if !draggable {
            self.drag_last = None;
        }
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_last.is_some()
    }

    /// Register an observer; it is notified after every committed change.
    pub fn add_observer(&mut self, observer: Box<dyn PresentationObserver>) {
        self.observers.push(observer);
    }

    /// Placements of every drawing observer, in registration order.
    pub fn placements(&self) -> Vec<OverlayPlacement> {
        self.observers.iter().filter_map(|o| o.placement()).collect()
    }

    /// Current scale and position, ready to be persisted.
    pub fn persisted(&self) -> PersistedPresentation {
        PersistedPresentation {
            ratio: Some(self.transform.scale_ratio()),
            position: Some(self.transform.position()),
        }
    }

    /// Clamp a candidate ratio to the limits.
    ///
    /// The maximum keeps the aspect ratio: whichever of width or height binds
    /// first wins. The minimum width is applied last.
    pub fn clamp_ratio(&self, candidate: f32) -> f32 {
        let image_w = self.transform.original_width();
        let image_h = self.transform.original_height();
        let max_ratio = (self.limits.max_width / image_w).min(self.limits.max_height / image_h);
        let min_ratio = self.limits.min_width / image_w;
        let mut ratio = candidate;
        if ratio > max_ratio {
            ratio = max_ratio;
        }
        if ratio < min_ratio {
            ratio = min_ratio;
        }
        ratio
    }

    /// Apply one wheel notch anchored at the image point under the pointer.
    ///
    /// Returns `Ok(None)` when the delta is zero or the clamped ratio does not
    /// differ from the current one.
    pub fn zoom(
        &mut self,
        wheel_delta: f32,
        pointer_scene: Vector2,
        host: &mut dyn HostWindow,
    ) -> Result<Option<PresentationChange>, CharaError> {
        if wheel_delta == 0.0 || !wheel_delta.is_finite() {
            return Ok(None);
        }
        let current = self.transform.scale_ratio();
        let step = if wheel_delta > 0.0 {
            self.zoom_step
        } else {
            -self.zoom_step
        };
        let ratio = self.clamp_ratio(current + step);
        if (ratio - current).abs() < RATIO_EPSILON {
            return Ok(None);
        }
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(CharaError::InvalidRatio(ratio));
        }

        let anchor = self.transform.scene_to_image(pointer_scene);
        debug!("zoom {} -> {} at ({},{})", current, ratio, anchor.x, anchor.y);
        self.transform.scale_at(anchor.x, anchor.y, ratio)?;
        self.commit(PresentationChange::Resized, host);
        Ok(Some(PresentationChange::Resized))
    }

    /// Start a drag at `screen`. Ignored while not draggable.
    pub fn begin_drag(&mut self, screen: Vector2) -> bool {
        if !self.draggable {
            return false;
        }
        self.drag_last = Some(screen);
        self.drag_moved = false;
        true
    }

    /// Follow the pointer during a drag, moving by the raw screen delta.
    pub fn drag_to(
        &mut self,
        screen: Vector2,
        host: &mut dyn HostWindow,
    ) -> Option<PresentationChange> {
        if !self.draggable {
            return None;
        }
        let last = self.drag_last?;
        let dx = screen.x - last.x;
        let dy = screen.y - last.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        self.drag_last = Some(screen);
        self.drag_moved = true;
        Some(self.translate(dx, dy, host))
    }

    /// Finish the drag. Returns whether the window actually moved.
    pub fn end_drag(&mut self) -> bool {
        let moved = self.drag_last.is_some() && self.drag_moved;
        self.drag_last = None;
        self.drag_moved = false;
        moved
    }

    /// Move the window by a screen-space delta.
    pub fn translate(&mut self, dx: f32, dy: f32, host: &mut dyn HostWindow) -> PresentationChange {
        self.transform.move_by(dx, dy);
        self.commit(PresentationChange::Moved, host);
        PresentationChange::Moved
    }

    /// Apply the startup scale and position.
    ///
    /// Without a persisted ratio the window opens at the character's initial
    /// width; without a persisted position it is centred on its screen.
    pub fn restore(
        &mut self,
        persisted: PersistedPresentation,
        host: &mut dyn HostWindow,
    ) -> Result<PresentationChange, CharaError> {
        let image_w = self.transform.original_width();
        let mut width = match persisted.ratio {
            Some(r) if r.is_finite() && r > 0.0 => image_w * r,
            _ => self.initial_width,
        };
        if width > self.limits.max_width {
            width = self.limits.max_width;
        }
        let ratio = self.clamp_ratio(width / image_w);
        self.transform.scale(ratio)?;

        match persisted.position {
            Some(p) if p.x.is_finite() && p.y.is_finite() => {
                self.transform.set_position(p.x, p.y)
            }
            _ => {
                let screen = self.current_screen(host);
                self.transform.center_in(screen);
            }
        }
        info!(
            "presentation restored: ratio {} at ({},{})",
            self.transform.scale_ratio(),
            self.transform.window_x(),
            self.transform.window_y()
        );
        self.commit(PresentationChange::Restored, host);
        Ok(PresentationChange::Restored)
    }

    /// Centre the window on the screen it currently overlaps.
    pub fn center_on_screen(&mut self, host: &mut dyn HostWindow) -> PresentationChange {
        let screen = self.current_screen(host);
        self.transform.center_in(screen);
        self.commit(PresentationChange::Moved, host);
        PresentationChange::Moved
    }

    /// Screen containing the window centre.
    ///
    /// Falls back to the last screen found, then to the primary screen.
    pub fn current_screen(&mut self, host: &dyn HostWindow) -> Rectangle {
        let t = &self.transform;
        let center = Vector2 {
            x: t.window_x() + t.width() / 2.0,
            y: t.window_y() + t.height() / 2.0,
        };
        if let Some(screen) = host.screen_bounds_containing(center) {
            self.last_screen = Some(screen);
            return screen;
        }
        match self.last_screen {
            Some(screen) => screen,
            None => host.primary_screen_bounds(),
        }
    }

    /// Image point under a click at `scene`.
    pub fn click(&self, scene: Vector2) -> Vector2 {
        self.transform.scene_to_image(scene)
    }

    /// Forward pointer hover to the observers.
    ///
    /// Returns the image point under the pointer, `None` once it left.
    pub fn pointer_moved(&mut self, scene: Option<Vector2>) -> Option<Vector2> {
        let view = PresentationView {
            transform: &self.transform,
            screen: self.last_screen.unwrap_or(crate::host::FALLBACK_SCREEN),
        };
        for observer in self.observers.iter_mut() {
            observer.pointer_moved(scene, &view);
        }
        scene.map(|p| self.transform.scene_to_image(p))
    }

    /// Push the transform to the host and fan out to observers.
    fn commit(&mut self, change: PresentationChange, host: &mut dyn HostWindow) {
        host.resize_window(self.transform.width(), self.transform.height());
        host.move_window(self.transform.window_x(), self.transform.window_y());
        let screen = self.current_screen(host);
        let view = PresentationView {
            transform: &self.transform,
            screen,
        };
        for observer in self.observers.iter_mut() {
            observer.relayout(change, &view);
        }
    }

    /// Recompute every observer without touching the transform.
    pub fn relayout(&mut self, host: &mut dyn HostWindow) {
        self.commit(PresentationChange::Moved, host);
    }
}
