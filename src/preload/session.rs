//! One run of the preload walk.
//!
//! A session owns the lease on the rendering surface for its whole lifetime
//! and walks, step by step, a reset render followed by every point of the
//! step's grid. Renders are strictly sequential: the only suspension point is
//! [`RenderingSurface::render_and_await_complete`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use instant::Instant;
use serde::Serialize;

use crate::core::{
    config::PreloadConfig,
    extent::Extent,
    geo::ZoomLevel,
};
use crate::events::{ProgressEvent, ProgressEventBus};
use crate::preload::{
    grid::{GridSampler, SamplePoint},
    progress::ProgressTracker,
};
use crate::traits::{RenderingSurface, SourceView};
use crate::{PreloadError, Result};

/// Cooperative cancellation flag shared between a session and its handle.
///
/// Setting it never interrupts an in-flight render; the session polls it
/// after each progress tick.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Counters collected over one session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreloadStats {
    /// Steps whose grid was walked to the end
    pub steps_completed: u32,
    /// View mutations sent to the surface, resets included
    pub views_issued: u64,
    /// Grid points skipped because the surface already covered them
    pub points_pruned: u64,
    pub ticks_emitted: u64,
    pub elapsed: Duration,
}

/// How a session ended when it did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum PreloadOutcome {
    Completed(PreloadStats),
    Cancelled(PreloadStats),
}

impl PreloadOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub fn stats(&self) -> &PreloadStats {
        match self {
            Self::Completed(stats) | Self::Cancelled(stats) => stats,
        }
    }
}

/// Inputs of a session, captured from the source view when `load` is called.
/// Later changes to the live map do not affect a running walk.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadPlan {
    pub extent: Extent,
    pub source_zoom: ZoomLevel,
    pub steps: u32,
    config: PreloadConfig,
}

impl PreloadPlan {
    pub fn capture(source: &dyn SourceView, step_count: u32, config: &PreloadConfig) -> Self {
        let steps = config.effective_steps(step_count);
        if steps < step_count {
            log::debug!(
                "capping preload at {} steps ({} requested)",
                steps,
                step_count
            );
        }

        Self {
            extent: source.visible_extent().normalized(),
            source_zoom: source.current_zoom(),
            steps,
            config: config.clone(),
        }
    }

    pub fn target_zoom(&self, step: u32) -> ZoomLevel {
        self.config.target_zoom(self.source_zoom, step)
    }

    pub fn grid(&self, step: u32) -> GridSampler {
        GridSampler::new(self.extent, step, self.target_zoom(step))
    }

    pub fn prune_enabled(&self) -> bool {
        self.config.prune_rendered_cells
    }
}

pub struct PreloadSession<'a, S: RenderingSurface + ?Sized> {
    surface: &'a mut S,
    plan: PreloadPlan,
    bus: Arc<ProgressEventBus>,
    cancel: CancelHandle,
    tracker: ProgressTracker,
    stats: PreloadStats,
    rendered_zoom: Option<ZoomLevel>,
}

impl<'a, S: RenderingSurface + ?Sized> PreloadSession<'a, S> {
    pub fn new(
        surface: &'a mut S,
        plan: PreloadPlan,
        bus: Arc<ProgressEventBus>,
        cancel: CancelHandle,
    ) -> Self {
        let tracker = ProgressTracker::for_steps(plan.steps);
        Self {
            surface,
            plan,
            bus,
            cancel,
            tracker,
            stats: PreloadStats::default(),
            rendered_zoom: None,
        }
    }

    /// Walk every step. Resolves `Cancelled` as soon as a tick observes the
    /// cancel flag, and fails without retrying on the first render error.
    pub async fn run(mut self) -> Result<PreloadOutcome> {
        let started = Instant::now();
        log::info!(
            "preload started: {} steps from zoom {} over {:?}",
            self.plan.steps,
            self.plan.source_zoom,
            self.plan.extent
        );

        if self.cancel.is_cancelled() {
            return Ok(self.cancelled(started));
        }

        for step in 1..=self.plan.steps {
            let grid = self.plan.grid(step);
            log::debug!(
                "step {}: {} points at zoom {}",
                step,
                grid.len(),
                grid.target_zoom()
            );

            // Prime the surface at the new zoom before the fine walk
            self.render_at(grid.first()).await?;
            if self.tick() {
                return Ok(self.cancelled(started));
            }

            for (index, point) in grid.iter().enumerate() {
                if self.is_already_covered(&grid, index, &point) {
                    log::debug!("step {}: pruned point {} at {:?}", step, index, point.coordinate);
                    self.stats.points_pruned += 1;
                } else {
                    self.render_at(point).await?;
                }

                if self.tick() {
                    return Ok(self.cancelled(started));
                }
            }

            self.stats.steps_completed += 1;
        }

        let value = self.tracker.finish();
        self.emit(value);
        self.stats.elapsed = started.elapsed();
        log::info!(
            "preload completed: {} views issued, {} pruned in {:?}",
            self.stats.views_issued,
            self.stats.points_pruned,
            self.stats.elapsed
        );
        Ok(PreloadOutcome::Completed(self.stats))
    }

    async fn render_at(&mut self, point: SamplePoint) -> Result<()> {
        self.surface.set_view(point.coordinate, point.target_zoom);
        self.stats.views_issued += 1;

        if let Err(e) = self.surface.render_and_await_complete().await {
            log::error!(
                "render failed at {:?} zoom {}: {}",
                point.coordinate,
                point.target_zoom,
                e
            );
            return Err(PreloadError::Render(e.to_string()));
        }

        self.rendered_zoom = Some(point.target_zoom);
        Ok(())
    }

    /// True when the last render already shows the point's whole cell at the
    /// point's zoom or deeper
    fn is_already_covered(&self, grid: &GridSampler, index: usize, point: &SamplePoint) -> bool {
        if !self.plan.prune_enabled() {
            return false;
        }
        let Some(rendered_zoom) = self.rendered_zoom else {
            return false;
        };
        if rendered_zoom < point.target_zoom {
            return false;
        }
        match grid.cell_extent(index) {
            Some(cell) => self.surface.rendered_extent().contains_extent(&cell),
            None => false,
        }
    }

    /// Emit the tick for the unit just finished. Returns true if the walk must stop.
    fn tick(&mut self) -> bool {
        let value = self.tracker.advance();
        self.emit(value);
        self.cancel.is_cancelled()
    }

    fn emit(&mut self, value: u8) {
        self.stats.ticks_emitted += 1;
        self.bus.emit(ProgressEvent::new(value));
    }

    fn cancelled(mut self, started: Instant) -> PreloadOutcome {
        self.stats.elapsed = started.elapsed();
        log::info!(
            "preload cancelled after {} ticks ({} steps done)",
            self.stats.ticks_emitted,
            self.stats.steps_completed
        );
        PreloadOutcome::Cancelled(self.stats)
    }
}
