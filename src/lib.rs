//! # daywatch
//!
//! **Daywatch** keeps a long-running application's per-day data fresh.
//!
//! It detects that the local calendar day advanced while the process stayed
//! resident (backgrounded overnight, suspended, ...), purges persisted per-day
//! caches, and broadcasts reset and refresh events so every screen re-derives
//! its state for the new day.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                ┌──────────────────────────────────────────────┐
//!                │  Coordinator (composition root)              │
//!                │  - EventBus    (one per process)             │
//!                │  - DateWatchdog (one per process)            │
//!                └──────┬─────────────────────────────┬─────────┘
//!                       ▼                             ▼
//!        ┌──────────────────────────┐      ┌──────────────────────┐
//!        │  DateWatchdog            │      │  EventBus            │
//!        │  - Clock (today)         │      │  kind → [callback]   │
//!        │  - KeyValueStore (marker)│─────►│  sync, in order      │
//!        │  - CacheInvalidator      │      │  panics isolated     │
//!        │  - poll timer (60s)      │      └───┬──────────┬───────┘
//!        └──────────────────────────┘          ▼          ▼
//!                                        screen callbacks  Subscribe impls
//!                                        (WaterReset, ...) (LogWriter, ...)
//! ```
//!
//! ### Day rollover
//! ```text
//! initialize() ──► check now ──► every poll_interval: check
//!
//! check:
//!   ├─► today == last observed           ─► nothing
//!   ├─► no marker yet                    ─► persist today
//!   └─► marker is another day:
//!         ├─► persist today              (before anything else)
//!         ├─► delete explicit keys       (best-effort)
//!         ├─► sweep prefixed keys        (best-effort)
//!         ├─► publish DailyReset, <Domain>Reset × 8
//!         ├─► publish ForceRefresh, RefreshFromSource, DataChanged
//!         └─► publish CacheCleared { cleared_count, failed_count, sweep_skipped }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Events**        | Named freshness events with typed payloads.                  | [`EventKind`], [`Event`], [`Payload`]      |
//! | **Bus**           | Synchronous in-process publish/subscribe.                    | [`EventBus`], [`Callback`]                 |
//! | **Watchdog**      | Day rollover detection and the reset sequence.               | [`DateWatchdog`], [`DateCheck`]            |
//! | **Invalidation**  | Explicit-key and prefix-sweep cache deletion.                | [`CacheInvalidator`], [`InvalidationReport`] |
//! | **Storage**       | Injected persisted key-value store.                          | [`KeyValueStore`], [`MemoryStore`]         |
//! | **Subscriber API**| Async hooks on every event (logging, diagnostics).           | [`Subscribe`], [`LogWriter`]               |
//! | **Errors**        | Typed store and watchdog errors.                             | [`StoreError`], [`WatchdogError`]          |
//! | **Configuration** | Poll interval, marker key, key lists.                        | [`WatchdogConfig`]                         |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use daywatch::{Coordinator, EventKind, LogWriter, MemoryStore, Subscribe, WatchdogConfig, callback};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let store = Arc::new(MemoryStore::with_entries([("todayWaterTotal", "1500")]));
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::default())];
//!
//!     let coordinator = Coordinator::builder(WatchdogConfig::default())
//!         .with_store(store)
//!         .with_subscribers(subs)
//!         .build();
//!
//!     coordinator.bus().subscribe(
//!         EventKind::DailyReset,
//!         callback(|ev| println!("new day: {:?}", ev.payload.as_daily_reset())),
//!     );
//!
//!     coordinator.start().await;
//!     coordinator.shutdown();
//! }
//! ```
mod core;
mod error;
mod events;
mod store;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{
    CacheInvalidator, Clock, Coordinator, CoordinatorBuilder, DEFAULT_EXPLICIT_KEYS,
    DEFAULT_MARKER_KEY, DEFAULT_POLL_INTERVAL, DEFAULT_SWEEP_PREFIXES, DateCheck, DateWatchdog,
    InvalidationReport, ManualClock, SystemClock, WatchdogConfig,
};
pub use error::{StoreError, WatchdogError};
pub use events::{CacheCleared, Callback, DailyReset, Domain, Event, EventBus, EventKind, Payload, callback};
pub use store::{KeyValueStore, MemoryStore};
pub use subscribers::{LogWriter, Subscribe};
