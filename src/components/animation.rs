//! Per-part clip playback.
//!
//! An [`AnimationTrack`] owns the clip set of one body part (eyes, dress,
//! hair...) and a playback cursor. It is a small state machine:
//!
//! - `Idle` with no clip: nothing attached yet (initial state).
//! - `Idle` with a clip: the clip is attached and shows its rest pose.
//! - `Playing`: the clip is attached and advances with [`AnimationTrack::tick`].
//!
//! Clip switches go through the host [`Compositor`] as a single swap so the
//! display never holds zero or two clips of the same part.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::debug;
use rustc_hash::FxHashMap;

use crate::components::frameclip::{FrameClip, FrameId};
use crate::error::CharaError;
use crate::host::Compositor;

/// Tolerance absorbing float drift when elapsed time lands on a frame edge.
const FRAME_EPSILON: f32 = 1e-5;

/// Playback state of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackState {
    /// Not advancing. Shows frame 0 of the attached clip, if any.
    Idle,
    /// Advancing through the attached clip.
    Playing { frame_index: usize, elapsed: f32 },
}

#[derive(Debug, Clone, Component)]
pub struct AnimationTrack {
    part: Arc<str>,
    clips: FxHashMap<Arc<str>, FrameClip>,
    current: Option<Arc<str>>,
    state: TrackState,
    /// Clip to switch to when the current one wraps to frame 0.
    queued: Option<Arc<str>>,
}

impl AnimationTrack {
    /// Create a track for `part` owning `clips`. Later clips replace earlier
    /// ones with the same name.
    pub fn new(part: impl Into<String>, clips: impl IntoIterator<Item = FrameClip>) -> Self {
        let part: String = part.into();
        let clips = clips
            .into_iter()
            .map(|c| (Arc::from(c.name()), c))
            .collect();
        Self {
            part: Arc::from(part),
            clips,
            current: None,
            state: TrackState::Idle,
            queued: None,
        }
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn clip(&self, name: &str) -> Option<&FrameClip> {
        self.clips.get(name)
    }

    /// The clip currently attached to the display.
    pub fn current_clip(&self) -> Option<&FrameClip> {
        self.current.as_ref().and_then(|k| self.clips.get(k))
    }

    /// Name of the pending loop-boundary transition, if any.
    pub fn queued_clip(&self) -> Option<&str> {
        self.queued.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        match self.state {
            TrackState::Idle => 0,
            TrackState::Playing { frame_index, .. } => frame_index,
        }
    }

    pub fn elapsed_in_frame(&self) -> f32 {
        match self.state {
            TrackState::Idle => 0.0,
            TrackState::Playing { elapsed, .. } => elapsed,
        }
    }

    /// Frame the host should draw right now.
    pub fn current_frame(&self) -> Option<&FrameId> {
        self.current_clip().map(|c| c.frame(self.frame_index()))
    }

    fn resolve(&self, name: &str) -> Result<Arc<str>, CharaError> {
        self.clips
            .get_key_value(name)
            .map(|(k, _)| k.clone())
            .ok_or_else(|| CharaError::UnknownClip {
                track: self.part.to_string(),
                clip: name.to_string(),
            })
    }

    /// Switch to `name` immediately and play it from frame 0.
    ///
    /// Triggering the attached clip never touches the compositor. If that
    /// clip is resting it resumes from frame 0; if it is playing nothing
    /// changes. Any queued transition is dropped.
    pub fn trigger(&mut self, name: &str, compositor: &mut dyn Compositor) -> Result<(), CharaError> {
        let key = self.resolve(name)?;
        self.queued = None;

        if self.current.as_deref() == Some(name) {
            if self.state == TrackState::Idle {
                self.state = TrackState::Playing {
                    frame_index: 0,
                    elapsed: 0.0,
                };
            }
            return Ok(());
        }

        self.swap_to(key, compositor);
        Ok(())
    }

    /// Switch to `name` when the current clip next wraps to frame 0.
    ///
    /// With nothing playing the switch happens at once. A newer request
    /// replaces an older pending one.
    pub fn queue(&mut self, name: &str, compositor: &mut dyn Compositor) -> Result<(), CharaError> {
        let key = self.resolve(name)?;
        match self.state {
            TrackState::Playing { .. } if self.current.as_deref() != Some(name) => {
                debug!("track '{}': queued '{}'", self.part, name);
                self.queued = Some(key);
                Ok(())
            }
            _ => self.trigger(name, compositor),
        }
    }

    /// Stop advancing and show the rest pose of the attached clip.
    pub fn rest(&mut self) {
        self.state = TrackState::Idle;
        self.queued = None;
    }

    /// Detach the attached clip and return to the initial state.
    pub fn release(&mut self, compositor: &mut dyn Compositor) {
        if let Some(clip) = self.current.take().and_then(|k| self.clips.get(&k)) {
            compositor.detach(&self.part, clip);
        }
        self.state = TrackState::Idle;
        self.queued = None;
    }

    /// Advance playback by `delta` seconds.
    ///
    /// Frames advance once per elapsed frame duration, catching up under
    /// long ticks and never skipping ahead of the time that actually passed.
    /// A queued transition is applied when the clip wraps.
    pub fn tick(&mut self, delta: f32, compositor: &mut dyn Compositor) {
        let TrackState::Playing {
            mut frame_index,
            elapsed,
        } = self.state
        else {
            return;
        };
        let Some(clip) = self.current_clip() else {
            return;
        };
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }
        let frame_duration = f64::from(clip.frame_duration());
        let frame_count = clip.len();

        // Whole frames are counted in one step so a long delta costs the same
        // as a short one.
        let total = f64::from(elapsed) + f64::from(delta);
        let steps = ((total + f64::from(FRAME_EPSILON)) / frame_duration).floor() as u64;
        let to_wrap = (frame_count - frame_index) as u64;
        let wrapped = steps >= to_wrap;
        let taken = if wrapped && self.queued.is_some() {
            to_wrap
        } else {
            steps
        };
        let count = frame_count as u64;
        frame_index = ((frame_index as u64 + taken % count) % count) as usize;
        let elapsed = (total - taken as f64 * frame_duration).max(0.0) as f32;

        self.state = TrackState::Playing {
            frame_index,
            elapsed,
        };

        if wrapped {
            if let Some(next) = self.queued.take() {
                self.swap_to(next, compositor);
                // leftover time carries into the new clip
                self.tick(elapsed, compositor);
            }
        }
    }

    fn swap_to(&mut self, key: Arc<str>, compositor: &mut dyn Compositor) {
        let old = self.current.as_ref().and_then(|k| self.clips.get(k));
        if let Some(new) = self.clips.get(&key) {
            debug!(
                "track '{}': {} -> {}",
                self.part,
                old.map(|c| c.name()).unwrap_or("<none>"),
                new.name()
            );
            compositor.swap(&self.part, old, new);
        }
        self.current = Some(key);
        self.state = TrackState::Playing {
            frame_index: 0,
            elapsed: 0.0,
        };
    }
}
