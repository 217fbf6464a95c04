//! Prelude module for common map-preloader types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use map_preloader::prelude::*;`

pub use crate::core::{
    config::{PreloadConfig, PreloadProfile, SurfaceConfig},
    extent::Extent,
    geo::{Point, ZoomLevel},
    view::View,
};

pub use crate::events::{ListenerId, ProgressEvent, ProgressEventBus};

pub use crate::preload::{
    CancelHandle, GridSampler, MapPreloader, PreloadHandle, PreloadOutcome, PreloadStats,
    SamplePoint, SpawnedPreload,
};

pub use crate::runtime::{init_runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::surfaces::{HeadlessSurface, RenderLog, StaticSource};

pub use crate::traits::{RenderingSurface, SourceView, SurfaceError};

pub use crate::{Error as PreloadError, Result};

pub use std::{sync::Arc, time::Duration};
