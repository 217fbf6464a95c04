//! Runtime abstraction layer for async operations
//!
//! Preload sessions are plain futures and can be awaited on any executor.
//! This module lets a caller hand them to a background runtime instead,
//! without the library depending on one runtime in particular.

use std::future::Future;
use std::pin::Pin;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(
        &self,
        future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
    ) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Abort the task at its next suspension point
    fn abort(&self);
}

/// Spawn a future on the global runtime, if one is available
pub fn spawn<F>(future: F) -> Option<Box<dyn AsyncHandle>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let spawner = try_runtime()?;
    log::debug!("spawning background task");
    Some(spawner.spawn_boxed(Box::pin(future)))
}

/// Default spawner implementations
pub mod spawners {
    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner. Requires being called from inside a tokio runtime.
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(
                &self,
                future: Pin<Box<dyn Future<Output = ()> + Send + 'static>>,
            ) -> Box<dyn AsyncHandle> {
                let handle = ::tokio::spawn(future);
                Box::new(TokioHandle(handle))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn abort(&self) {
                self.0.abort();
            }
        }
    }
}

/// Unified async utilities
pub mod async_utils {
    /// Async delay that works across runtimes
    pub async fn async_delay(duration: std::time::Duration) {
        if duration.is_zero() {
            return;
        }

        #[cfg(feature = "tokio-runtime")]
        {
            ::tokio::time::sleep(duration).await;
        }

        #[cfg(not(feature = "tokio-runtime"))]
        {
            // No timer available; this blocks the executor thread
            std::thread::sleep(duration);
        }
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Initialize the runtime with a specific spawner. Returns false if one was
/// already installed.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) -> bool {
    RUNTIME.set(spawner).is_ok()
}

/// Get the installed spawner. Without one, falls back to tokio when that
/// feature is enabled and the caller is inside a tokio runtime.
pub fn try_runtime() -> Option<&'static dyn AsyncSpawner> {
    if let Some(spawner) = RUNTIME.get() {
        return Some(spawner.as_ref());
    }

    #[cfg(feature = "tokio-runtime")]
    {
        static TOKIO: spawners::tokio_impl::TokioSpawner = spawners::tokio_impl::TokioSpawner;

        if ::tokio::runtime::Handle::try_current().is_ok() {
            return Some(&TOKIO);
        }
        log::debug!("no tokio runtime on this thread");
    }

    None
}
