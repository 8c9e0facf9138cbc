use crate::EmbedError;
use scrawl_canvas::{default_palette, Color, SurfaceKind, SurfaceOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "scrawl.config.json";

/// When drawings are written back to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SavePolicy {
    /// Only when the save button is pressed
    #[default]
    Explicit,
    /// Also after every completed stroke
    OnPointerRelease,
}

/// Drawing embed configuration, read from `scrawl.config.json` in the vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedConfig {
    /// Surface variant built for new widgets
    pub surface: SurfaceKind,

    /// Width of a blank canvas, in pixels
    pub default_width: u32,

    /// Width divided by height of a blank canvas
    pub aspect_ratio: f32,

    pub save_policy: SavePolicy,

    /// Drop cached surfaces whose tag was absent for this many passes
    pub evict_after_passes: Option<u32>,

    pub brush_width: f32,

    /// Swatches offered by the scene toolbar
    pub palette: Vec<Color>,

    /// Initial drawing color
    pub ink: Color,

    /// Undo levels kept per surface (0 = unlimited)
    pub history_levels: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceKind::Scene,
            default_width: 700,
            aspect_ratio: std::f32::consts::SQRT_2,
            save_policy: SavePolicy::Explicit,
            evict_after_passes: Some(16),
            brush_width: 2.0,
            palette: default_palette(),
            ink: Color::WHITE,
            history_levels: 100,
        }
    }
}

impl EmbedConfig {
    /// Load config from a vault directory, or defaults when there is none
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EmbedError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EmbedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Height of a blank canvas
    pub fn default_height(&self) -> u32 {
        if self.aspect_ratio > 0.0 {
            (self.default_width as f32 / self.aspect_ratio).round() as u32
        } else {
            0
        }
    }

    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            kind: self.surface,
            width: self.default_width,
            height: self.default_height(),
            ink: self.ink,
            brush_width: self.brush_width,
            palette: self.palette.clone(),
            history_levels: self.history_levels,
        }
    }
}
