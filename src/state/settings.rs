use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::DrawingState;

/// Environment variable that overrides where saved pictures go
pub const PICTURES_DIR_ENV: &str = "SKETCHPAD_PICTURES_DIR";

/// App configuration, persisted through eframe storage between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SketchSettings {
    /// Tool and style the next session starts with
    pub drawing: DrawingState,
    /// Identifier stored with every saved picture
    pub author: String,
    /// Directory for the native picture store
    pub pictures_dir: PathBuf,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            drawing: DrawingState::default(),
            author: "anonymous".to_owned(),
            pictures_dir: PathBuf::from("pictures"),
        }
    }
}

impl SketchSettings {
    /// Apply overrides from the process environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(PICTURES_DIR_ENV).filter(|dir| !dir.is_empty()) {
            self.pictures_dir = PathBuf::from(dir);
        }
        self
    }
}
