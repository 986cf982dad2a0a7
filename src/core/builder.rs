use std::sync::Arc;

use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::config::WatchdogConfig;
use super::coordinator::Coordinator;
use super::watchdog::DateWatchdog;
use crate::{
    events::EventBus,
    store::{KeyValueStore, MemoryStore},
    subscribers::Subscribe,
};

/// Builder for constructing a [`Coordinator`] with optional collaborators.
pub struct CoordinatorBuilder {
    cfg: WatchdogConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl CoordinatorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: WatchdogConfig) -> Self {
        Self {
            cfg,
            store: None,
            clock: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the persisted store holding cache entries and the day marker.
    ///
    /// Defaults to a fresh [`MemoryStore`], which does not survive restarts.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the day source. Defaults to [`SystemClock`].
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets async subscribers that observe every event kind.
    ///
    /// Typical use is diagnostics such as [`LogWriter`](crate::LogWriter).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds and returns the Coordinator instance.
    ///
    /// This consumes the builder and wires:
    /// - one event bus
    /// - the all-events subscribers
    /// - one date watchdog (not yet initialized)
    pub fn build(self) -> Coordinator {
        let bus = Arc::new(EventBus::new());
        for sub in self.subscribers {
            debug!(subscriber = sub.name(), "attaching subscriber to every event");
            bus.subscribe_async_all(sub);
        }

        let store = self.store.unwrap_or_else(|| {
            debug!("no store configured; using in-memory store");
            Arc::new(MemoryStore::new())
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let watchdog = DateWatchdog::new(self.cfg, Arc::clone(&bus), store, clock);
        Coordinator::new_internal(bus, watchdog)
    }
}
