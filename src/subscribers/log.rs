//! # LogWriter — event tracer
//!
//! A minimal subscriber that writes every bus event to `tracing`.
//! Attach it through [`CoordinatorBuilder::with_subscribers`](crate::CoordinatorBuilder::with_subscribers).
//!
//! ## Example output
//! ```text
//! INFO daywatch: [daily-reset] date=2024-01-02 seq=41
//! DEBUG daywatch: [domain-reset] event=waterReset seq=42
//! DEBUG daywatch: [refresh] event=forceRefresh seq=50
//! INFO daywatch: [cache-cleared] cleared=31 failed=0 seq=53
//! DEBUG daywatch: [data] event=mealLogged payload={"type":"data","data":{...}}
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind, Payload};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match (&e.kind, &e.payload) {
            (EventKind::DailyReset, Payload::DailyReset(p)) => {
                info!(target: "daywatch", date = %p.date, seq = e.seq, "[daily-reset]");
            }
            (EventKind::CacheCleared, Payload::CacheCleared(p)) => {
                if p.failed_count > 0 || p.sweep_skipped {
                    warn!(
                        target: "daywatch",
                        cleared = p.cleared_count,
                        failed = p.failed_count,
                        sweep_skipped = p.sweep_skipped,
                        seq = e.seq,
                        "[cache-cleared]"
                    );
                } else {
                    info!(
                        target: "daywatch",
                        cleared = p.cleared_count,
                        failed = p.failed_count,
                        seq = e.seq,
                        "[cache-cleared]"
                    );
                }
            }
            _ if e.is_reset() => {
                debug!(target: "daywatch", event = %e.kind, seq = e.seq, "[domain-reset]");
            }
            (EventKind::ForceRefresh | EventKind::RefreshFromSource | EventKind::DataChanged, _) => {
                debug!(target: "daywatch", event = %e.kind, seq = e.seq, "[refresh]");
            }
            _ => {
                let payload = serde_json::to_string(&e.payload)
                    .unwrap_or_else(|err| format!("<unserializable: {err}>"));
                debug!(target: "daywatch", event = %e.kind, seq = e.seq, payload = %payload, "[data]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn handles_every_payload_shape() {
        let writer = LogWriter::new();
        let events = [
            Event::new(EventKind::WaterLogged, Payload::Data(json!({ "ml": 250 }))),
            Event::new(EventKind::ForceRefresh, Payload::Empty),
            Event::new(EventKind::SleepReset, Payload::Empty),
            Event::new(EventKind::DailyReset, Payload::Empty),
            Event::new(
                EventKind::CacheCleared,
                Payload::CacheCleared(crate::events::CacheCleared {
                    timestamp: chrono::Utc::now(),
                    cleared_count: 31,
                    failed_count: 0,
                    sweep_skipped: true,
                }),
            ),
        ];
        for ev in &events {
            writer.on_event(ev).await;
        }
        assert_eq!(writer.name(), "LogWriter");
    }
}
