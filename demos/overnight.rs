//! # Example: overnight
//!
//! Simulates an app left open across midnight.
//!
//! Shows how to:
//! - Build a [`Coordinator`] with an injected store and a [`ManualClock`].
//! - Attach the built-in [`LogWriter`] and a custom [`Subscribe`] impl.
//! - Register a screen callback on a domain reset event.
//! - Observe the reset sequence when the day changes between two timer ticks.
//!
//! ## Flow
//! ```text
//! start()            ──► first check: marker written (first run)
//! clock += 1 day
//! timer tick         ──► marker rewritten
//!                        ├─► explicit keys + sweep deleted
//!                        ├─► DailyReset, WaterReset … SummaryReset
//!                        ├─► ForceRefresh, RefreshFromSource, DataChanged
//!                        └─► CacheCleared
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example overnight
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use daywatch::{
    Coordinator, Event, EventKind, LogWriter, ManualClock, MemoryStore, Subscribe,
    WatchdogConfig, callback,
};
use tracing_subscriber::EnvFilter;

/// Prints the refresh events a screen would react to.
struct RefreshPrinter;

#[async_trait::async_trait]
impl Subscribe for RefreshPrinter {
    async fn on_event(&self, ev: &Event) {
        if EventKind::REFRESH.contains(&ev.kind) {
            println!("[screen] refresh requested: {}", ev.kind);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let store = Arc::new(MemoryStore::with_entries([
        ("todayWaterTotal", "1750"),
        ("todayMood", "focused"),
        ("waterChartCache", "[250,500,1000]"),
        ("userProfile", r#"{"name":"sam"}"#),
    ]));
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap_or_default(),
    ));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new()), Arc::new(RefreshPrinter)];

    let cfg = WatchdogConfig::default().with_poll_interval(Duration::from_millis(200));
    let coordinator = Coordinator::builder(cfg)
        .with_store(store.clone())
        .with_clock(clock.clone())
        .with_subscribers(subs)
        .build();

    coordinator.bus().subscribe(
        EventKind::WaterReset,
        callback(|ev| {
            if let Some(reset) = ev.payload.as_daily_reset() {
                println!("[water screen] totals reset for {}", reset.date);
            }
        }),
    );

    coordinator.start().await;
    println!(
        "started; last observed day = {:?}",
        coordinator.watchdog().get_last_checked_date()
    );

    println!("... midnight passes ...");
    clock.advance_days(1);
    tokio::time::sleep(Duration::from_millis(300)).await;

    println!(
        "after rollover: last observed day = {:?}, userProfile kept = {}, todayWaterTotal kept = {}",
        coordinator.watchdog().get_last_checked_date(),
        store.contains("userProfile").await,
        store.contains("todayWaterTotal").await,
    );

    let report = coordinator.watchdog().force_cache_refresh().await;
    println!("manual refresh: cleared={} failed={}", report.cleared, report.failed);

    // let spawned subscribers drain
    tokio::time::sleep(Duration::from_millis(50)).await;
    coordinator.shutdown();
}
