//! Freshness events: types and the synchronous bus.
//!
//! This module groups the event **data model** and the **bus** used by the
//! date watchdog and by screens to publish and subscribe to freshness events.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`Payload`] event classification and payload
//! - [`Domain`] tracked per-day domains and their reset events
//! - [`EventBus`] in-process publish/subscribe table
//!
//! ## Quick reference
//! - **Publishers**: `DateWatchdog` (reset sequence), screens (convenience publishers).
//! - **Consumers**: screen callbacks, async [`Subscribe`](crate::Subscribe) implementations,
//!   [`LogWriter`](crate::LogWriter).

mod bus;
mod domain;
mod event;

pub(crate) use bus::panic_message;
pub use bus::{Callback, EventBus, callback};
pub use domain::Domain;
pub use event::{CacheCleared, DailyReset, Event, EventKind, Payload};
