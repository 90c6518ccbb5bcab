// Surface options, with defaults, optionally read from a TOML file.
//
// Example file:
// brush_size = 40
// threshold = 35
// top_color = "#3A7BD5"
// bottom_color = "#00D2FF"

use crate::error::{Error, Result};
use crate::types::Color;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BRUSH_SIZE: f32 = 30.0;
pub const DEFAULT_THRESHOLD: f32 = 20.0;
pub const DEFAULT_GRID_SIZE: usize = 50;
pub const DEFAULT_REVEAL_MS: u64 = 500;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScratchConfig {
    /// Erasure footprint: stroke width, and tap-disc diameter.
    pub brush_size: f32,
    /// Coverage percentage (0-100) at which `on_threshold` fires.
    pub threshold: f32,
    /// Accept pointer input at all.
    pub enabled: bool,
    /// Occupancy grid resolution (cells per side).
    pub grid_size: usize,
    /// Default reveal length used by hosts that don't pick their own.
    pub reveal_duration_ms: u64,

    /// Fallback fill for the procedural overlay.
    pub color: Option<Color>,
    /// Gradient start (top edge). Falls back to `color`.
    pub top_color: Option<Color>,
    /// Gradient end (bottom edge). Falls back to `color`.
    pub bottom_color: Option<Color>,
    pub ribbon_color: Option<Color>,
    pub bow_color: Option<Color>,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            brush_size: DEFAULT_BRUSH_SIZE,
            threshold: DEFAULT_THRESHOLD,
            enabled: true,
            grid_size: DEFAULT_GRID_SIZE,
            reveal_duration_ms: DEFAULT_REVEAL_MS,
            color: None,
            top_color: None,
            bottom_color: None,
            ribbon_color: None,
            bow_color: None,
        }
    }
}

impl ScratchConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: ScratchConfig = toml::from_str(src)?;
        Ok(cfg.normalized())
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let cfg = Self::from_toml_str(&src)?;
        tracing::debug!(path = %path.display(), ?cfg, "loaded scratch config");
        Ok(cfg)
    }

    /// Pull out-of-range values back to something usable.
    pub fn normalized(mut self) -> Self {
        self.threshold = clamp_threshold(self.threshold);
        self.brush_size = self.brush_size.max(0.0);
        self.grid_size = self.grid_size.max(1);
        self
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }
}

pub(crate) fn clamp_threshold(t: f32) -> f32 {
    if t.is_nan() { DEFAULT_THRESHOLD } else { t.clamp(0.0, 100.0) }
}
