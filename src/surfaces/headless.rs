//! Simulated off-screen surface.
//!
//! Paints nothing. Its rendered extent is what a real map of the same pixel
//! size would show at the current view, which is enough to drive the
//! preloader without a graphics stack.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::{
    config::SurfaceConfig,
    extent::Extent,
    geo::{Point, ZoomLevel},
    view::View,
};
use crate::runtime::async_utils::async_delay;
use crate::traits::{RenderingSurface, SurfaceError};

/// Views rendered by a [`HeadlessSurface`], shared so it can be inspected
/// after the surface has been handed to a preloader
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    views: Arc<Mutex<Vec<View>>>,
}

impl RenderLog {
    pub fn views(&self) -> Vec<View> {
        self.views.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.views.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, view: View) {
        if let Ok(mut views) = self.views.lock() {
            views.push(view);
        }
    }
}

#[derive(Debug)]
pub struct HeadlessSurface {
    view: View,
    size: Point,
    render_delay: Duration,
    /// 1-based render pass that fails, for exercising error paths
    fail_on_render: Option<usize>,
    renders: usize,
    log: RenderLog,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            view: View::default(),
            size: Point::new(width as f64, height as f64),
            render_delay: Duration::ZERO,
            fail_on_render: None,
            renders: 0,
            log: RenderLog::default(),
        }
    }

    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self::new(config.width, config.height).with_render_delay(config.render_delay())
    }

    pub fn with_render_delay(mut self, delay: Duration) -> Self {
        self.render_delay = delay;
        self
    }

    pub fn with_failure_on_render(mut self, render: usize) -> Self {
        self.fail_on_render = Some(render);
        self
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn size(&self) -> Point {
        self.size
    }

    /// Handle to the list of views this surface has rendered
    pub fn render_log(&self) -> RenderLog {
        self.log.clone()
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }
}

#[async_trait]
impl RenderingSurface for HeadlessSurface {
    fn set_view(&mut self, center: Point, zoom: ZoomLevel) {
        self.view = View::new(center, zoom);
    }

    async fn render_and_await_complete(&mut self) -> Result<(), SurfaceError> {
        self.renders += 1;
        async_delay(self.render_delay).await;

        if self.fail_on_render == Some(self.renders) {
            return Err(format!("render pass {} failed", self.renders).into());
        }

        self.log.push(self.view);
        Ok(())
    }

    fn rendered_extent(&self) -> Extent {
        self.view.extent_for_size(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_records_view() {
        let mut surface = HeadlessSurface::new(256, 256);
        let log = surface.render_log();

        surface.set_view(Point::new(10.0, 20.0), 4.0);
        surface.render_and_await_complete().await.unwrap();

        assert_eq!(log.views(), vec![View::new(Point::new(10.0, 20.0), 4.0)]);
        let center = surface.rendered_extent().center();
        assert!((center.x - 10.0).abs() < 1e-6);
        assert!((center.y - 20.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mut surface = HeadlessSurface::new(256, 256).with_failure_on_render(2);
        let log = surface.render_log();

        assert!(surface.render_and_await_complete().await.is_ok());
        assert!(surface.render_and_await_complete().await.is_err());
        assert!(surface.render_and_await_complete().await.is_ok());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_from_config() {
        let config = SurfaceConfig {
            width: 300,
            height: 200,
            render_delay_ms: 7,
        };
        let surface = HeadlessSurface::from_config(&config);
        assert_eq!(surface.size(), Point::new(300.0, 200.0));
        assert_eq!(surface.render_delay, Duration::from_millis(7));
    }
}
