pub mod headless;
pub mod source;

// Re-exports for convenience
pub use headless::{HeadlessSurface, RenderLog};
pub use source::StaticSource;
