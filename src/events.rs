use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Percentage tick emitted while a preload session walks its grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Completion in percent, 0..=100
    pub value: u8,
}

impl ProgressEvent {
    pub fn new(value: u8) -> Self {
        Self {
            value: value.min(100),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.value == 100
    }
}

/// Handle returned when registering a listener, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Progress listener callback type
pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Instance-owned multi-listener dispatcher for [`ProgressEvent`]s.
///
/// Delivery is synchronous and in registration order. Listeners are called
/// on a snapshot of the list, so a listener may add or remove listeners (or
/// cancel the session that is emitting) without deadlocking; such changes
/// take effect from the next event.
#[derive(Default)]
pub struct ProgressEventBus {
    listeners: Mutex<Vec<(ListenerId, ProgressCallback)>>,
    next_id: AtomicU64,
}

impl ProgressEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add_listener<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Arc::new(callback)));
        }
        id
    }

    /// Unregister a listener. Returns false if the id was unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let Ok(mut listeners) = self.listeners.lock() else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Deliver an event to every registered listener
    pub fn emit(&self, event: ProgressEvent) {
        let snapshot: Vec<ProgressCallback> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            Err(_) => return,
        };

        for callback in snapshot {
            callback(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for ProgressEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
