use std::future::IntoFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{BoxFuture, FutureExt};
use futures::lock::Mutex;

use crate::core::config::{PreloadConfig, PreloadProfile};
use crate::events::{ListenerId, ProgressEvent, ProgressEventBus};
use crate::preload::session::{CancelHandle, PreloadOutcome, PreloadPlan, PreloadSession};
use crate::runtime::{self, AsyncHandle};
use crate::traits::{RenderingSurface, SourceView};
use crate::{PreloadError, Result};

type SharedSurface = Arc<Mutex<Box<dyn RenderingSurface>>>;

/// Warms an off-screen map surface ahead of the user.
///
/// ```no_run
/// # use map_preloader::prelude::*;
/// # async fn demo(source: StaticSource) -> map_preloader::Result<()> {
/// let mut preloader = MapPreloader::new();
/// preloader.init()?;
/// preloader.add_event_listener(|event| println!("{}%", event.value));
/// preloader.set_rendering_map(HeadlessSurface::default());
///
/// let outcome = preloader.load(&source, 3)?.await?;
/// assert!(outcome.is_completed());
/// # Ok(())
/// # }
/// ```
pub struct MapPreloader {
    config: PreloadConfig,
    bus: Arc<ProgressEventBus>,
    surface: Option<SharedSurface>,
    active: Arc<AtomicBool>,
    initialized: bool,
}

impl MapPreloader {
    pub fn new() -> Self {
        Self {
            config: PreloadConfig::default(),
            bus: Arc::new(ProgressEventBus::new()),
            surface: None,
            active: Arc::new(AtomicBool::new(false)),
            initialized: false,
        }
    }

    pub fn with_config(config: PreloadConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn with_profile(profile: PreloadProfile) -> Result<Self> {
        Self::with_config(profile.resolve())
    }

    /// Validate configuration and mark the preloader ready. Safe to call repeatedly.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.config.validate()?;
        self.initialized = true;
        log::debug!("map preloader initialized with {:?}", self.config);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &PreloadConfig {
        &self.config
    }

    /// Replace the configuration; sessions already started keep the old one
    pub fn set_config(&mut self, config: PreloadConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Assign or replace the off-screen surface. A session already running
    /// keeps its lease on the previous surface until it ends.
    pub fn set_rendering_map<S>(&mut self, surface: S)
    where
        S: RenderingSurface + 'static,
    {
        self.surface = Some(Arc::new(Mutex::new(Box::new(surface))));
    }

    pub fn has_rendering_map(&self) -> bool {
        self.surface.is_some()
    }

    pub fn add_event_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.bus.add_listener(listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.bus.remove_listener(id)
    }

    pub fn event_bus(&self) -> Arc<ProgressEventBus> {
        Arc::clone(&self.bus)
    }

    /// Whether a session currently holds the surface
    pub fn is_loading(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Start a session warming `step_count` zoom levels below the source's current zoom.
    ///
    /// The source is sampled here, once. Nothing runs until the returned
    /// handle is awaited or spawned. Overlapping sessions on the same
    /// preloader are serialized on the surface lease rather than interleaved.
    pub fn load(&self, source: &dyn SourceView, step_count: u32) -> Result<PreloadHandle> {
        let surface = self
            .surface
            .as_ref()
            .map(Arc::clone)
            .ok_or(PreloadError::NoRenderingSurface)?;

        if self.is_loading() {
            log::warn!(
                "load() called while a preload session is in flight; it will wait for the surface"
            );
        }

        let plan = PreloadPlan::capture(source, step_count, &self.config);
        let cancel = CancelHandle::new();
        let token = cancel.clone();
        let bus = Arc::clone(&self.bus);
        let active = Arc::clone(&self.active);

        let future = async move {
            let mut lease = surface.lock().await;
            let _active = ActiveFlag::raise(active);
            PreloadSession::new(&mut **lease, plan, bus, token)
                .run()
                .await
        }
        .boxed();

        Ok(PreloadHandle { future, cancel })
    }
}

impl Default for MapPreloader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MapPreloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapPreloader")
            .field("config", &self.config)
            .field("bus", &self.bus)
            .field("has_surface", &self.surface.is_some())
            .field("loading", &self.is_loading())
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// Marks the preloader busy for as long as a session holds the surface
struct ActiveFlag(Arc<AtomicBool>);

impl ActiveFlag {
    fn raise(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for ActiveFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A started (but not yet polled) preload session together with its cancel switch
pub struct PreloadHandle {
    future: BoxFuture<'static, Result<PreloadOutcome>>,
    cancel: CancelHandle,
}

impl PreloadHandle {
    /// Cancel switch that can be moved into listeners or other tasks
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run the session on the global runtime instead of awaiting it in place
    pub fn spawn(self) -> Result<SpawnedPreload> {
        let (tx, rx) = oneshot::channel();
        let future = self.future;
        let task = runtime::spawn(async move {
            let _ = tx.send(future.await);
        })
        .ok_or(PreloadError::NoRuntime)?;

        Ok(SpawnedPreload {
            task,
            result: rx,
            cancel: self.cancel,
        })
    }
}

impl IntoFuture for PreloadHandle {
    type Output = Result<PreloadOutcome>;
    type IntoFuture = BoxFuture<'static, Result<PreloadOutcome>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

/// A session running on the background runtime
pub struct SpawnedPreload {
    task: Box<dyn AsyncHandle>,
    result: oneshot::Receiver<Result<PreloadOutcome>>,
    cancel: CancelHandle,
}

impl SpawnedPreload {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Drop the session at its next await. Prefer [`SpawnedPreload::cancel`],
    /// which lets the in-flight render finish and report its tick.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the session to settle
    pub async fn wait(self) -> Result<PreloadOutcome> {
        self.result.await.map_err(|_| PreloadError::SessionDropped)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{geo::Point, view::View};
    use crate::surfaces::{HeadlessSurface, StaticSource};

    /// Live map of the same pixel size as the default headless surface
    fn source() -> StaticSource {
        StaticSource::from_view(View::new(Point::new(0.0, 0.0), 5.0), Point::new(512.0, 512.0))
    }

    #[test]
    fn test_load_without_surface_fails() {
        let preloader = MapPreloader::new();
        assert!(matches!(
            preloader.load(&source(), 2),
            Err(PreloadError::NoRenderingSurface)
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut preloader = MapPreloader::new();
        assert!(!preloader.is_initialized());
        preloader.init().unwrap();
        preloader.init().unwrap();
        assert!(preloader.is_initialized());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PreloadConfig {
            zoom_step: -2.0,
            ..Default::default()
        };
        assert!(MapPreloader::with_config(config.clone()).is_err());

        let mut preloader = MapPreloader::new();
        assert!(preloader.set_config(config).is_err());
        assert_eq!(preloader.config(), &PreloadConfig::default());
    }

    #[tokio::test]
    async fn test_loading_flag_tracks_session() {
        let mut preloader = MapPreloader::new();
        preloader.set_rendering_map(HeadlessSurface::default());

        let active = Arc::clone(&preloader.active);
        let seen_busy = Arc::new(AtomicBool::new(true));
        let sink = Arc::clone(&seen_busy);
        preloader.add_event_listener(move |_| {
            if !active.load(Ordering::Acquire) {
                sink.store(false, Ordering::Release);
            }
        });

        let handle = preloader.load(&source(), 1).unwrap();
        assert!(!preloader.is_loading());

        let outcome = handle.await.unwrap();
        assert!(outcome.is_completed());
        assert!(seen_busy.load(Ordering::Acquire));
        assert!(!preloader.is_loading());
    }

    #[test]
    fn test_spawn_without_runtime_fails() {
        let mut preloader = MapPreloader::new();
        preloader.set_rendering_map(HeadlessSurface::default());

        let handle = preloader.load(&source(), 1).unwrap();
        assert!(matches!(handle.spawn(), Err(PreloadError::NoRuntime)));
        assert!(!preloader.is_loading());
    }

    #[tokio::test]
    async fn test_spawned_session_completes() {
        let mut preloader = MapPreloader::new();
        preloader.set_rendering_map(HeadlessSurface::default());

        let spawned = preloader.load(&source(), 2).unwrap().spawn().unwrap();
        let outcome = spawned.wait().await.unwrap();
        assert!(outcome.is_completed());
        assert_eq!(outcome.stats().views_issued, 1 + 4 + 1 + 9);
    }
}
