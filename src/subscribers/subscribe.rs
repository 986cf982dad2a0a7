//! # Async subscriber trait
//!
//! `Subscribe` is the extension point for screens whose reaction to an event
//! is itself async (re-fetching totals from the backend, rewriting a cache
//! entry). The bus stays synchronous: each delivery is spawned as its own task
//! on the tokio runtime (see [`EventBus::subscribe_async`](crate::EventBus::subscribe_async)).
//!
//! ## Contract
//! - Implementations may be slow; they do **not** block the publisher nor other subscribers.
//! - Deliveries to the same subscriber may run concurrently; guard shared state.
//! - Panics are caught and logged.
//!
//! ## Example (skeleton)
//! ```rust
//! use daywatch::{Event, EventKind, Subscribe};
//!
//! struct WaterScreen;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for WaterScreen {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::WaterReset {
//!             // refetch today's water total...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "water-screen" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for async event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
