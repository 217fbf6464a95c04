//! Configuration for the preloader
//!
//! Options can be picked from a preset profile, built by hand, or loaded
//! from JSON. Every path goes through [`PreloadConfig::validate`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::constants::{
    DEFAULT_MAX_STEPS, DEFAULT_SURFACE_SIZE, DEFAULT_ZOOM_STEP, MAX_STEPS_LIMIT,
};
use crate::core::geo::ZoomLevel;
use crate::{PreloadError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum PreloadProfile {
    Balanced,
    Light,
    Thorough,
    Custom(PreloadConfig),
}

impl PreloadProfile {
    pub fn resolve(&self) -> PreloadConfig {
        match self {
            Self::Balanced => PreloadConfig::default(),
            Self::Light => PreloadConfig {
                zoom_step: DEFAULT_ZOOM_STEP,
                max_zoom: Some(18.0),
                max_steps: 3,
                prune_rendered_cells: true,
                surface: SurfaceConfig {
                    width: 256,
                    height: 256,
                    render_delay_ms: 0,
                },
            },
            Self::Thorough => PreloadConfig {
                zoom_step: DEFAULT_ZOOM_STEP,
                max_zoom: None,
                max_steps: DEFAULT_MAX_STEPS + 2,
                prune_rendered_cells: false,
                surface: SurfaceConfig {
                    width: 1024,
                    height: 1024,
                    render_delay_ms: 0,
                },
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for PreloadProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    /// Zoom increment added per step on top of the source zoom
    pub zoom_step: f64,
    /// Target zooms are clamped to this level when set
    pub max_zoom: Option<ZoomLevel>,
    /// Requested step counts above this are capped
    pub max_steps: u32,
    /// Skip view mutations for cells the surface already shows at sufficient detail
    pub prune_rendered_cells: bool,
    pub surface: SurfaceConfig,
}

impl PreloadConfig {
    /// Parse a JSON document, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(PreloadError::InvalidConfig(format!(
                "zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        if self.max_steps == 0 || self.max_steps > MAX_STEPS_LIMIT {
            return Err(PreloadError::InvalidConfig(format!(
                "max_steps must be between 1 and {}, got {}",
                MAX_STEPS_LIMIT, self.max_steps
            )));
        }
        if let Some(max_zoom) = self.max_zoom {
            if !(max_zoom.is_finite() && max_zoom >= 0.0) {
                return Err(PreloadError::InvalidConfig(format!(
                    "max_zoom must be non-negative, got {}",
                    max_zoom
                )));
            }
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(PreloadError::InvalidConfig(
                "surface dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Target zoom for `step` (1-based). Strictly increasing in `step` until `max_zoom` is hit.
    pub fn target_zoom(&self, source_zoom: ZoomLevel, step: u32) -> ZoomLevel {
        let zoom = source_zoom + self.zoom_step * step as f64;
        match self.max_zoom {
            Some(max_zoom) => zoom.min(max_zoom),
            None => zoom,
        }
    }

    /// Number of steps actually walked for a requested `step_count`
    pub fn effective_steps(&self, step_count: u32) -> u32 {
        step_count.min(self.max_steps)
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            zoom_step: DEFAULT_ZOOM_STEP,
            max_zoom: None,
            max_steps: DEFAULT_MAX_STEPS,
            prune_rendered_cells: true,
            surface: SurfaceConfig::default(),
        }
    }
}

/// Settings for the headless off-screen surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    /// Simulated latency of one render pass
    pub render_delay_ms: u64,
}

impl SurfaceConfig {
    pub fn render_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.render_delay_ms)
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_SIZE.0,
            height: DEFAULT_SURFACE_SIZE.1,
            render_delay_ms: 0,
        }
    }
}
