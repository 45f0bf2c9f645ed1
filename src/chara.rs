//! Character definition loading.
//!
//! A character is described by one JSON file: the canvas geometry
//! ([`CharaData`]), the height reserved above the image, and the body parts
//! with their clips. Frame identifiers are paths relative to the definition
//! file; resolving them to textures is the host's job.
//!
//! ```json
//! {
//!   "data": { "image_width": 1000, "image_height": 1500, "...": 0 },
//!   "extra_top": 24,
//!   "parts": [
//!     { "name": "body", "z": 0, "initial": "idle",
//!       "clips": [ { "name": "idle", "frames": ["body/idle.png"] } ] },
//!     { "name": "eyes", "z": 10, "initial": "open",
//!       "clips": [
//!         { "name": "open", "frames": ["eyes/open.png"] },
//!         { "name": "blink", "prefix": "eyes/blink_", "start": 0, "end": 4,
//!           "suffix": ".png", "fps": 20 } ] }
//!   ]
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::*;
use log::info;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::components::animation::AnimationTrack;
use crate::components::frameclip::{DEFAULT_FPS, FrameClip, build_seq_names};
use crate::components::part::{Part, ZIndex};
use crate::error::CharaError;
use crate::resources::charadata::CharaData;
use crate::resources::displaylist::DisplayList;

fn default_fps() -> f32 {
    DEFAULT_FPS
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharaDefinition {
    pub data: CharaData,
    #[serde(default)]
    pub extra_top: f32,
    pub parts: Vec<PartDefinition>,
    /// Lines shown when the character is clicked.
    #[serde(default)]
    pub click_lines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartDefinition {
    pub name: String,
    #[serde(default)]
    pub z: i32,
    /// Clip triggered as soon as the part is spawned.
    #[serde(default)]
    pub initial: Option<String>,
    pub clips: Vec<ClipDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipDefinition {
    pub name: String,
    #[serde(flatten)]
    pub frames: FrameSource,
    #[serde(default = "default_fps")]
    pub fps: f32,
}

/// Explicit frame list or a numbered sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FrameSource {
    List {
        frames: Vec<String>,
    },
    Sequence {
        prefix: String,
        start: u32,
        end: u32,
        #[serde(default)]
        suffix: String,
    },
}

impl FrameSource {
    pub fn frame_names(&self) -> Vec<String> {
        match self {
            FrameSource::List { frames } => frames.clone(),
            FrameSource::Sequence {
                prefix,
                start,
                end,
                suffix,
            } => build_seq_names(prefix, *start, *end, suffix),
        }
    }
}

impl ClipDefinition {
    pub fn build(&self) -> Result<FrameClip, CharaError> {
        FrameClip::new(&self.name, self.frames.frame_names(), self.fps)
    }
}

impl PartDefinition {
    /// Build the part's track. The initial clip, if any, must exist.
    pub fn build_track(&self) -> Result<AnimationTrack, CharaError> {
        let clips = self
            .clips
            .iter()
            .map(ClipDefinition::build)
            .collect::<Result<Vec<_>, _>>()?;
        let track = AnimationTrack::new(&self.name, clips);
        if let Some(initial) = &self.initial {
            if !track.has_clip(initial) {
                return Err(CharaError::UnknownClip {
                    track: self.name.clone(),
                    clip: initial.clone(),
                });
            }
        }
        Ok(track)
    }
}

impl CharaDefinition {
    pub fn from_json(json: &str) -> Result<Self, CharaError> {
        let def: CharaDefinition =
            serde_json::from_str(json).map_err(|e| CharaError::Definition(e.to_string()))?;
        def.validate()?;
        Ok(def)
    }

    /// Check the canvas geometry and that part names are unique. The
    /// compositor keys attached clips by part name.
    pub fn validate(&self) -> Result<(), CharaError> {
        self.data.validate()?;
        let mut names = FxHashSet::default();
        for part in &self.parts {
            if !names.insert(part.name.as_str()) {
                return Err(CharaError::Definition(format!(
                    "duplicate part name '{}'",
                    part.name
                )));
            }
        }
        Ok(())
    }

    /// Every distinct frame identifier used by any clip.
    pub fn frame_ids(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut ids = Vec::new();
        for part in &self.parts {
            for clip in &part.clips {
                for name in clip.frames.frame_names() {
                    if seen.insert(name.clone()) {
                        ids.push(name);
                    }
                }
            }
        }
        ids
    }
}

/// Read and validate a definition file.
pub fn load_definition(path: &Path) -> Result<CharaDefinition, CharaError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CharaError::Definition(format!("{}: {}", path.display(), e)))?;
    let def = CharaDefinition::from_json(&json)?;
    info!(
        "Loaded character {:?}: {} parts, {} frames",
        path,
        def.parts.len(),
        def.frame_ids().len()
    );
    Ok(def)
}

/// Spawn one entity per part and trigger initial clips.
///
/// All tracks are built before anything is spawned, so a broken definition
/// leaves the world untouched.
pub fn spawn_parts(world: &mut World, def: &CharaDefinition) -> Result<Vec<Entity>, CharaError> {
    def.validate()?;
    let tracks = def
        .parts
        .iter()
        .map(|p| p.build_track().map(|t| (p, t)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut entities = Vec::with_capacity(tracks.len());
    for (part, mut track) in tracks {
        if let Some(initial) = &part.initial {
            let mut display = world.resource_mut::<DisplayList>();
            track.trigger(initial, &mut *display)?;
        }
        let entity = world
            .spawn((Part::new(&part.name), ZIndex(part.z), track))
            .id();
        entities.push(entity);
    }
    Ok(entities)
}

/// Find the entity of the part called `name`.
pub fn find_part(world: &mut World, name: &str) -> Option<Entity> {
    let mut q = world.query::<(Entity, &Part)>();
    q.iter(world)
        .find(|(_, p)| p.name.as_ref() == name)
        .map(|(e, _)| e)
}

/// Detach every attached clip, then despawn the parts. Returns how many
/// parts were removed.
pub fn release_parts(world: &mut World) -> usize {
    world.resource_scope(|world, mut display: Mut<DisplayList>| {
        let mut q = world.query_filtered::<(Entity, &mut AnimationTrack), With<Part>>();
        let entities: Vec<Entity> = q
            .iter_mut(world)
            .map(|(entity, mut track)| {
                track.release(&mut *display);
                entity
            })
            .collect();
        for entity in &entities {
            world.despawn(*entity);
        }
        entities.len()
    })
}
