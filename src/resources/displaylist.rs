//! In-crate [`Compositor`] used by the raylib host.
//!
//! Records which clip is attached for each part. The renderer only draws
//! parts that have an entry here, so a track that was never triggered (or
//! was released) stays invisible.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;

use crate::components::frameclip::FrameClip;
use crate::host::Compositor;

#[derive(Resource, Debug, Default, Clone)]
pub struct DisplayList {
    attached: FxHashMap<Arc<str>, FrameClip>,
    attach_count: u64,
    detach_count: u64,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clip currently shown for `part`.
    pub fn attached(&self, part: &str) -> Option<&FrameClip> {
        self.attached.get(part)
    }

    pub fn is_attached(&self, part: &str) -> bool {
        self.attached.contains_key(part)
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn attach_count(&self) -> u64 {
        self.attach_count
    }

    pub fn detach_count(&self) -> u64 {
        self.detach_count
    }
}

impl Compositor for DisplayList {
    fn attach(&mut self, part: &str, clip: &FrameClip) {
        self.attach_count += 1;
        if let Some(previous) = self.attached.insert(Arc::from(part), clip.clone()) {
            warn!(
                "part '{}' attached '{}' while '{}' was still attached",
                part,
                clip.name(),
                previous.name()
            );
        }
    }

    fn detach(&mut self, part: &str, clip: &FrameClip) {
        self.detach_count += 1;
        match self.attached.get(part) {
            Some(current) if current.name() == clip.name() => {
                self.attached.remove(part);
            }
            Some(current) => warn!(
                "part '{}' detach of '{}' ignored, '{}' is attached",
                part,
                clip.name(),
                current.name()
            ),
            None => warn!("part '{}' detach of '{}' with nothing attached", part, clip.name()),
        }
    }

    fn swap(&mut self, part: &str, old: Option<&FrameClip>, new: &FrameClip) {
        if old.is_some() {
            self.detach_count += 1;
        }
        self.attach_count += 1;
        self.attached.insert(Arc::from(part), new.clone());
    }
}
