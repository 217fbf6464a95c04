use serde::{Deserialize, Serialize};

use crate::core::constants::{EARTH_CIRCUMFERENCE, TILE_SIZE};

/// Map scale; each whole step doubles the detail per unit area.
pub type ZoomLevel = f64;

/// Represents a point in projected map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Scale factor for a zoom level
pub fn zoom_scale(zoom: ZoomLevel) -> f64 {
    2_f64.powf(zoom)
}

/// Web Mercator resolution in projection units (meters) per pixel
pub fn resolution_at_zoom(zoom: ZoomLevel) -> f64 {
    // At zoom 0 the whole world fits in a single tile
    EARTH_CIRCUMFERENCE / (TILE_SIZE as f64 * zoom_scale(zoom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_halves_per_zoom() {
        let r5 = resolution_at_zoom(5.0);
        let r6 = resolution_at_zoom(6.0);
        assert!((r5 / r6 - 2.0).abs() < 1e-9);
    }
}
