#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use map_preloader::prelude::*;

pub const SCENARIO_ZOOM: f64 = 5.0;

pub fn scenario_extent() -> Extent {
    Extent::from_coords(-50.0, 100.0, 50.0, 200.0)
}

pub fn scenario_source() -> StaticSource {
    StaticSource::new(SCENARIO_ZOOM, scenario_extent())
}

/// Shared record of `set_view` calls
pub type ViewLog = Arc<Mutex<Vec<(Point, ZoomLevel)>>>;

/// Surface whose painted area shrinks by half per zoom level, starting from
/// `base_extent` at `base_zoom`. Matches a live map of the same pixel size.
pub struct ScaledSurface {
    base_width: f64,
    base_height: f64,
    base_zoom: ZoomLevel,
    view: View,
    views: ViewLog,
}

impl ScaledSurface {
    pub fn new(base_extent: Extent, base_zoom: ZoomLevel) -> Self {
        Self {
            base_width: base_extent.width(),
            base_height: base_extent.height(),
            base_zoom,
            view: View::new(base_extent.center(), base_zoom),
            views: ViewLog::default(),
        }
    }

    pub fn view_log(&self) -> ViewLog {
        Arc::clone(&self.views)
    }
}

#[async_trait]
impl RenderingSurface for ScaledSurface {
    fn set_view(&mut self, center: Point, zoom: ZoomLevel) {
        self.view = View::new(center, zoom);
        self.views.lock().unwrap().push((center, zoom));
    }

    async fn render_and_await_complete(&mut self) -> std::result::Result<(), SurfaceError> {
        tokio::task::yield_now().await;
        Ok(())
    }

    fn rendered_extent(&self) -> Extent {
        let factor = 2_f64.powf(self.view.zoom - self.base_zoom);
        Extent::from_center_and_size(
            self.view.center,
            self.base_width / factor,
            self.base_height / factor,
        )
    }
}

/// Surface that always claims to have painted the same extent
pub struct ConstantSurface {
    extent: Extent,
    views: ViewLog,
}

impl ConstantSurface {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            views: ViewLog::default(),
        }
    }

    pub fn view_log(&self) -> ViewLog {
        Arc::clone(&self.views)
    }
}

#[async_trait]
impl RenderingSurface for ConstantSurface {
    fn set_view(&mut self, center: Point, zoom: ZoomLevel) {
        self.views.lock().unwrap().push((center, zoom));
    }

    async fn render_and_await_complete(&mut self) -> std::result::Result<(), SurfaceError> {
        Ok(())
    }

    fn rendered_extent(&self) -> Extent {
        self.extent
    }
}

/// Register a listener that records every progress value
pub fn record_progress(preloader: &MapPreloader) -> Arc<Mutex<Vec<u8>>> {
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&values);
    preloader.add_event_listener(move |event| sink.lock().unwrap().push(event.value));
    values
}

/// Expected `set_view` sequence for a full walk over `extent`
pub fn expected_views(
    extent: Extent,
    source_zoom: ZoomLevel,
    steps: u32,
) -> Vec<(Point, ZoomLevel)> {
    let mut views = Vec::new();
    for step in 1..=steps {
        let zoom = source_zoom + step as f64;
        let grid = GridSampler::new(extent, step, zoom);
        views.push((extent.min, zoom));
        views.extend(grid.iter().map(|p| (p.coordinate, p.target_zoom)));
    }
    views
}
