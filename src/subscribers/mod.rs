//! # Async subscribers for the freshness bus.
//!
//! This module provides the [`Subscribe`] trait and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   DateWatchdog ── publish(kind) ──► EventBus ──► sync callbacks (in order)
//!                                        │
//!                                        └──► async_callback ──► tokio::spawn
//!                                                                    │
//!                                                          Subscribe::on_event(&Event)
//!                                                          ┌─────────┼─────────┐
//!                                                          ▼         ▼         ▼
//!                                                      LogWriter  Screen A  Screen B
//! ```

mod log;
mod subscribe;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;
use tracing::{error, warn};

use crate::events::{Event, panic_message};

pub use log::LogWriter;
pub use subscribe::Subscribe;

/// Spawns `sub.on_event(ev)` on the current runtime with panic isolation.
///
/// Outside a tokio runtime the event is dropped for this subscriber.
pub(crate) fn spawn_on_event(sub: Arc<dyn Subscribe>, ev: Event) {
    let Ok(handle) = Handle::try_current() else {
        warn!(
            subscriber = sub.name(),
            event = %ev.kind,
            "no tokio runtime; async subscriber skipped"
        );
        return;
    };

    handle.spawn(async move {
        let fut = sub.on_event(&ev);
        if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
            error!(
                subscriber = sub.name(),
                event = %ev.kind,
                panic = %panic_message(panic_err.as_ref()),
                "async subscriber panicked"
            );
        }
    });
}
