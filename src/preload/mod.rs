pub mod grid;
pub mod preloader;
pub mod progress;
pub mod session;

// Re-exports for convenience
pub use grid::{GridIter, GridSampler, SamplePoint};
pub use preloader::{MapPreloader, PreloadHandle, SpawnedPreload};
pub use progress::ProgressTracker;
pub use session::{CancelHandle, PreloadOutcome, PreloadPlan, PreloadSession, PreloadStats};
