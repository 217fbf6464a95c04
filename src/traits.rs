//! Adapter traits for the preloader's collaborators
//!
//! The preloader never talks to a concrete map widget. It reads the live map
//! through [`SourceView`] and drives an off-screen map through
//! [`RenderingSurface`].

use async_trait::async_trait;

use crate::core::{extent::Extent, geo::Point, geo::ZoomLevel};

/// Error reported by a surface when a render pass fails
pub type SurfaceError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only access to the live map the user is looking at
pub trait SourceView {
    /// Current zoom level of the live map
    fn current_zoom(&self) -> ZoomLevel;

    /// Geographic extent currently visible on the live map
    fn visible_extent(&self) -> Extent;
}

/// A controllable off-screen map instance.
///
/// While a preload session runs it holds the only lease on the surface,
/// so implementations need no internal coordination between calls.
#[async_trait]
pub trait RenderingSurface: Send + Sync {
    /// Reposition the surface. Does not render.
    fn set_view(&mut self, center: Point, zoom: ZoomLevel);

    /// Trigger a render pass and resolve once painting has finished
    async fn render_and_await_complete(&mut self) -> Result<(), SurfaceError>;

    /// Extent painted at the current view
    fn rendered_extent(&self) -> Extent;
}
