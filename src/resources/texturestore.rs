//! Frame textures keyed by frame identifier.

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use raylib::prelude::*;
use rustc_hash::FxHashMap;

#[derive(Resource, Default)]
pub struct TextureStore {
    pub map: FxHashMap<Arc<str>, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, frame: &str) -> Option<&Texture2D> {
        self.map.get(frame)
    }

    pub fn insert(&mut self, frame: &str, texture: Texture2D) {
        self.map.insert(Arc::from(frame), texture);
    }

    /// Load every frame from `base`. Missing or unreadable files are logged
    /// and skipped; the part simply stays invisible on those frames.
    pub fn load_frames(
        &mut self,
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        base: &Path,
        frames: &[String],
    ) -> usize {
        let mut loaded = 0;
        for frame in frames {
            let path = base.join(frame);
            let Some(path_str) = path.to_str() else {
                warn!("Skipping non UTF-8 frame path {:?}", path);
                continue;
            };
            match rl.load_texture(th, path_str) {
                Ok(texture) => {
                    self.insert(frame, texture);
                    loaded += 1;
                }
                Err(e) => warn!("Failed to load frame {}: {}", path_str, e),
            }
        }
        info!("Loaded {}/{} frame textures", loaded, frames.len());
        loaded
    }
}
