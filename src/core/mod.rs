//! Freshness core: day detection, cache invalidation and wiring.
//!
//! The only entry points most applications need are [`Coordinator`] and its
//! builder; the watchdog and invalidator are public for tests and for hosts
//! that wire their own composition root.
//!
//! Internal modules:
//! - [`clock`]: local calendar-day sources;
//! - [`config`]: watchdog settings and default key lists;
//! - [`invalidation`]: explicit-key pass and prefix sweep;
//! - [`watchdog`]: day check, reset sequence, periodic timer;
//! - [`coordinator`] / [`builder`]: one bus + one watchdog per process.

mod builder;
mod clock;
mod config;
mod coordinator;
mod invalidation;
mod watchdog;

pub use builder::CoordinatorBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    DEFAULT_EXPLICIT_KEYS, DEFAULT_MARKER_KEY, DEFAULT_POLL_INTERVAL, DEFAULT_SWEEP_PREFIXES,
    WatchdogConfig,
};
pub use coordinator::Coordinator;
pub use invalidation::{CacheInvalidator, InvalidationReport};
pub use watchdog::{DateCheck, DateWatchdog};
