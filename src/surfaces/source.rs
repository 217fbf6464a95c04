use serde::{Deserialize, Serialize};

use crate::core::{extent::Extent, geo::Point, geo::ZoomLevel, view::View};
use crate::traits::SourceView;

/// A live-map snapshot that never changes.
/// Useful for headless runs and for driving the preloader from stored state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticSource {
    pub zoom: ZoomLevel,
    pub extent: Extent,
}

impl StaticSource {
    pub fn new(zoom: ZoomLevel, extent: Extent) -> Self {
        Self { zoom, extent }
    }

    /// Source showing `view` on a screen of `size` pixels
    pub fn from_view(view: View, size: Point) -> Self {
        Self::new(view.zoom, view.extent_for_size(size))
    }
}

impl SourceView for StaticSource {
    fn current_zoom(&self) -> ZoomLevel {
        self.zoom
    }

    fn visible_extent(&self) -> Extent {
        self.extent
    }
}
