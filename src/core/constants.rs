//! Core constants shared by the preloader and its headless adapters.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Earth circumference at the equator in Web Mercator meters.
pub const EARTH_CIRCUMFERENCE: f64 = 40_075_016.685_578_5;

/// Zoom increment between two consecutive preload steps.
pub const DEFAULT_ZOOM_STEP: f64 = 1.0;

/// Upper bound on the number of steps a single `load` will walk.
/// Step 9 already means 257 x 257 render passes.
pub const DEFAULT_MAX_STEPS: u32 = 8;

/// Largest `max_steps` a config may carry. Step 16 is a 32769 x 32769 grid.
pub const MAX_STEPS_LIMIT: u32 = 16;

/// Tolerance used when comparing extents in projection units.
pub const EXTENT_EPSILON: f64 = 1e-9;

/// Default off-screen surface size in pixels.
pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (512, 512);
