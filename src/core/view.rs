use crate::core::extent::Extent;
use crate::core::geo::{resolution_at_zoom, Point, ZoomLevel};
use serde::{Deserialize, Serialize};

/// Position of a map surface: where it is centered and how far it is zoomed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// The center of the view in projection coordinates
    pub center: Point,
    /// The current zoom level
    pub zoom: ZoomLevel,
}

impl View {
    /// Creates a new view, clamping negative zoom to 0
    pub fn new(center: Point, zoom: ZoomLevel) -> Self {
        Self {
            center,
            zoom: zoom.max(0.0),
        }
    }

    /// Gets the resolution in projection units per pixel at the current zoom level
    pub fn resolution(&self) -> f64 {
        resolution_at_zoom(self.zoom)
    }

    /// Extent covered by a surface of `size` pixels showing this view
    pub fn extent_for_size(&self, size: Point) -> Extent {
        let resolution = self.resolution();
        Extent::from_center_and_size(self.center, size.x * resolution, size.y * resolution)
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), 0.0)
    }
}
