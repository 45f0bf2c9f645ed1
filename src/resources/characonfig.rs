//! Persisted character settings.
//!
//! Stage scale and position plus a few window and chat options, stored in an
//! INI file. Loading and saving never fail hard: a missing or broken file
//! keeps the defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [stage]
//! x = 120
//! y = 300
//! ratio = 0.42
//!
//! [window]
//! always_on_top = true
//! target_fps = 60
//! zoom_step = 0.01
//!
//! [chat]
//! enabled = true
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use raylib::prelude::Vector2;
use std::path::PathBuf;

use crate::resources::presentation::{PersistedPresentation, ZOOM_STEP};

const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_ALWAYS_ON_TOP: bool = true;
const DEFAULT_CHAT_ENABLED: bool = true;
pub const DEFAULT_CONFIG_PATH: &str = "./desktopchara.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CharaConfig {
    /// Window x position, unset until the first gesture.
    pub stage_x: Option<f32>,
    /// Window y position, unset until the first gesture.
    pub stage_y: Option<f32>,
    /// Last scale ratio.
    pub ratio: Option<f32>,
    pub always_on_top: bool,
    pub target_fps: u32,
    /// Ratio change per wheel notch.
    pub zoom_step: f32,
    pub chat_enabled: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for CharaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CharaConfig {
    pub fn new() -> Self {
        Self {
            stage_x: None,
            stage_y: None,
            ratio: None,
            always_on_top: DEFAULT_ALWAYS_ON_TOP,
            target_fps: DEFAULT_TARGET_FPS,
            zoom_step: ZOOM_STEP,
            chat_enabled: DEFAULT_CHAT_ENABLED,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [stage] section
        if let Some(x) = config.getfloat("stage", "x").ok().flatten() {
            self.stage_x = Some(x as f32);
        }
        if let Some(y) = config.getfloat("stage", "y").ok().flatten() {
            self.stage_y = Some(y as f32);
        }
        if let Some(ratio) = config.getfloat("stage", "ratio").ok().flatten() {
            if ratio > 0.0 {
                self.ratio = Some(ratio as f32);
            }
        }

        // [window] section
        if let Some(on_top) = config.getbool("window", "always_on_top").ok().flatten() {
            self.always_on_top = on_top;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(step) = config.getfloat("window", "zoom_step").ok().flatten() {
            self.zoom_step = step as f32;
        }

        // [chat] section
        if let Some(enabled) = config.getbool("chat", "enabled").ok().flatten() {
            self.chat_enabled = enabled;
        }

        info!(
            "Loaded config: stage=({:?},{:?}) ratio={:?}, on_top={}, fps={}, chat={}",
            self.stage_x,
            self.stage_y,
            self.ratio,
            self.always_on_top,
            self.target_fps,
            self.chat_enabled
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [stage] section
        if let Some(x) = self.stage_x {
            config.set("stage", "x", Some(x.to_string()));
        }
        if let Some(y) = self.stage_y {
            config.set("stage", "y", Some(y.to_string()));
        }
        if let Some(ratio) = self.ratio {
            config.set("stage", "ratio", Some(ratio.to_string()));
        }

        // [window] section
        config.set(
            "window",
            "always_on_top",
            Some(self.always_on_top.to_string()),
        );
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "zoom_step", Some(self.zoom_step.to_string()));

        // [chat] section
        config.set("chat", "enabled", Some(self.chat_enabled.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Stored scale and position for
    /// [`PresentationController::restore`](crate::resources::presentation::PresentationController::restore).
    pub fn persisted(&self) -> PersistedPresentation {
        let position = match (self.stage_x, self.stage_y) {
            (Some(x), Some(y)) => Some(Vector2 { x, y }),
            _ => None,
        };
        PersistedPresentation {
            ratio: self.ratio,
            position,
        }
    }

    pub fn set_persisted(&mut self, persisted: PersistedPresentation) {
        if let Some(ratio) = persisted.ratio {
            self.ratio = Some(ratio);
        }
        if let Some(position) = persisted.position {
            self.stage_x = Some(position.x);
            self.stage_y = Some(position.y);
        }
    }
}
