//! # Coordinator: the process-wide freshness root.
//!
//! The [`Coordinator`] owns the single [`EventBus`] and the single
//! [`DateWatchdog`] of a process. Build it once at startup, hand clones of
//! [`Coordinator::bus`] to screens, and call [`Coordinator::start`].
//!
//! ```text
//! app bootstrap
//!   └─► Coordinator::builder(cfg).with_store(..).build()
//!         ├─► EventBus           (screens subscribe / publish)
//!         └─► DateWatchdog       (start() → initialize, shutdown() → cleanup)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use daywatch::{Coordinator, EventKind, WatchdogConfig, callback};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let coordinator = Coordinator::builder(WatchdogConfig::default()).build();
//!
//!     coordinator.bus().subscribe(
//!         EventKind::WaterReset,
//!         callback(|ev| println!("water totals reset for {:?}", ev.payload.as_daily_reset())),
//!     );
//!
//!     coordinator.start().await;
//!     assert!(coordinator.watchdog().is_detector_initialized());
//!     coordinator.shutdown();
//! }
//! ```

use std::sync::Arc;

use super::builder::CoordinatorBuilder;
use super::config::WatchdogConfig;
use super::watchdog::DateWatchdog;
use crate::events::EventBus;

/// Composition root for the event bus and the date watchdog.
#[derive(Clone, Debug)]
pub struct Coordinator {
    bus: Arc<EventBus>,
    watchdog: Arc<DateWatchdog>,
}

impl Coordinator {
    /// Starts building a coordinator.
    pub fn builder(cfg: WatchdogConfig) -> CoordinatorBuilder {
        CoordinatorBuilder::new(cfg)
    }

    pub(super) fn new_internal(bus: Arc<EventBus>, watchdog: Arc<DateWatchdog>) -> Self {
        Self { bus, watchdog }
    }

    /// The process-wide event bus.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The process-wide date watchdog.
    pub fn watchdog(&self) -> &Arc<DateWatchdog> {
        &self.watchdog
    }

    /// Initializes the watchdog (immediate check, then periodic checks).
    pub async fn start(&self) {
        self.watchdog.initialize().await;
    }

    /// Stops periodic checks. Subscriptions stay in place.
    pub fn shutdown(&self) {
        self.watchdog.cleanup();
    }
}
