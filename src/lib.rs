//! # map-preloader
//!
//! Progressive tile-cache preloading for map surfaces.
//!
//! A [`MapPreloader`] takes a snapshot of the live map (a [`SourceView`]) and
//! walks an off-screen [`RenderingSurface`] over ever finer grids at ever
//! deeper zoom levels, so the tile layer underneath gets to fetch and cache
//! imagery before the user zooms in. Progress is reported as integer
//! percentages through an instance-owned event bus, and a running walk can be
//! cancelled cooperatively.

pub mod core;
pub mod events;
pub mod preload;
pub mod prelude;
pub mod runtime;
pub mod surfaces;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{PreloadConfig, PreloadProfile, SurfaceConfig},
    extent::Extent,
    geo::{Point, ZoomLevel},
    view::View,
};

pub use events::{ListenerId, ProgressEvent, ProgressEventBus};

pub use preload::{
    grid::{GridSampler, SamplePoint},
    preloader::{MapPreloader, PreloadHandle, SpawnedPreload},
    session::{CancelHandle, PreloadOutcome, PreloadStats},
};

pub use surfaces::{HeadlessSurface, StaticSource};

pub use traits::{RenderingSurface, SourceView, SurfaceError};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, PreloadError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PreloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("No rendering surface assigned")]
    NoRenderingSurface,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No async runtime available; run inside a tokio runtime or call runtime::init_runtime")]
    NoRuntime,

    #[error("Preload session was dropped before it settled")]
    SessionDropped,
}

/// Error type alias for convenience
pub type Error = PreloadError;

/// Install `env_logger` as the `log` backend, honouring `RUST_LOG`.
/// Returns `false` if a logger was already installed.
#[cfg(feature = "debug")]
pub fn init_logging() -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .is_ok()
}
