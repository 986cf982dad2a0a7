//! # DateWatchdog: calendar-day rollover detection.
//!
//! Detects that the local calendar day advanced while the process stayed
//! resident, purges per-day caches, and tells every screen to re-derive its
//! state.
//!
//! ## State machine
//! ```text
//! Uninitialized ── initialize() ──► Active ── cleanup() ──► Uninitialized
//!                                   │  ▲
//!                                   └──┘ initialize() (no-op)
//! ```
//!
//! ## Day check
//! ```text
//! today = clock.today()
//!   ├─ mirror == today            → Unchanged (no I/O)
//!   ├─ marker unset / corrupt     → persist today → FirstRun
//!   ├─ marker == today            → Unchanged
//!   └─ marker != today            → persist today → reset sequence → Changed
//! ```
//!
//! ## Reset sequence
//! ```text
//! 1. invalidate:  explicit keys + prefix sweep   (best-effort, never fails)
//! 2. publish:     DailyReset → WaterReset … SummaryReset
//! 3. publish:     ForceRefresh → RefreshFromSource → DataChanged
//! 4. publish:     CacheCleared { cleared_count, failed_count, sweep_skipped }
//! ```
//!
//! ## Rules
//! - The marker is persisted **before** invalidation starts; an overlapping
//!   check sees the new day and does nothing.
//! - Detection and persistence are serialized by an async mutex; the reset
//!   sequence runs outside it.
//! - A failed check is logged and retried on the next tick; the timer never stops on errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::config::WatchdogConfig;
use super::invalidation::{CacheInvalidator, InvalidationReport};
use crate::error::WatchdogError;
use crate::events::{CacheCleared, DailyReset, Domain, EventBus, EventKind, Payload};
use crate::store::KeyValueStore;

/// Result of one day check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCheck {
    /// No marker existed; it now holds `date`. Nothing was invalidated.
    FirstRun { date: NaiveDate },
    /// Still the same day.
    Unchanged { date: NaiveDate },
    /// The day changed and the reset sequence ran.
    Changed {
        previous: NaiveDate,
        current: NaiveDate,
        report: InvalidationReport,
    },
}

impl DateCheck {
    #[inline]
    pub fn is_changed(&self) -> bool {
        matches!(self, DateCheck::Changed { .. })
    }
}

/// Owned periodic-check task.
struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Watches the local calendar day and drives the reset sequence on rollover.
pub struct DateWatchdog {
    cfg: WatchdogConfig,
    bus: Arc<EventBus>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    invalidator: CacheInvalidator,

    /// In-memory copy of the persisted marker.
    last_checked: Mutex<Option<NaiveDate>>,
    /// Serializes detection + marker persistence.
    check_lock: tokio::sync::Mutex<()>,
    initialized: AtomicBool,
    poll: Mutex<Option<PollHandle>>,
}

impl DateWatchdog {
    /// Creates an uninitialized watchdog.
    pub fn new(
        cfg: WatchdogConfig,
        bus: Arc<EventBus>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let invalidator = CacheInvalidator::new(Arc::clone(&store), &cfg);
        Arc::new(Self {
            cfg,
            bus,
            store,
            clock,
            invalidator,
            last_checked: Mutex::new(None),
            check_lock: tokio::sync::Mutex::new(()),
            initialized: AtomicBool::new(false),
            poll: Mutex::new(None),
        })
    }

    /// Runs one day check immediately, then arms the periodic check.
    ///
    /// Calling it again while active is a no-op. Must be called from within a
    /// tokio runtime.
    pub async fn initialize(self: &Arc<Self>) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("date watchdog already initialized");
            return;
        }

        self.run_check("initialize").await;

        // cleanup() may have run while the first check was suspended.
        if !self.initialized.load(Ordering::SeqCst) {
            return;
        }

        let period = self.cfg.poll_interval_clamped();
        let token = CancellationToken::new();
        let task = tokio::spawn(poll_loop(Arc::downgrade(self), period, token.clone()));
        if let Some(stale) = self.poll_guard().replace(PollHandle { token, task }) {
            stale.token.cancel();
        }
        info!(interval = ?period, "date watchdog initialized");
    }

    /// Stops the periodic check and returns to the uninitialized state.
    ///
    /// A timer check already in flight is not interrupted: it finishes (and
    /// may still publish a reset), after which the timer task exits.
    pub fn cleanup(&self) {
        if let Some(handle) = self.poll_guard().take() {
            handle.token.cancel();
            drop(handle.task);
        }
        if self.initialized.swap(false, Ordering::SeqCst) {
            info!("date watchdog stopped");
        }
    }

    /// Runs the day check now.
    ///
    /// Errors are logged and returned; the watchdog state is unaffected by them.
    pub async fn force_date_check(&self) -> Result<DateCheck, WatchdogError> {
        let res = self.check_date().await;
        if let Err(e) = &res {
            warn!(error = %e, label = e.as_label(), origin = "forced", "day check failed");
        }
        res
    }

    /// Clears the explicit cache keys and asks screens to refresh, without a day change.
    ///
    /// The marker is untouched and no reset events are published.
    pub async fn force_cache_refresh(&self) -> InvalidationReport {
        let report = self.invalidator.clear_explicit().await;
        self.broadcast_refresh();
        self.broadcast_cleared(&report);
        info!(
            cleared = report.cleared,
            failed = report.failed,
            "forced cache refresh"
        );
        report
    }

    /// Runs the full reset sequence for today regardless of the marker.
    pub async fn force_comprehensive_reset(&self) -> InvalidationReport {
        let today = self.clock.today();
        info!(date = %today, "forced comprehensive reset");
        self.reset_sequence(today).await
    }

    /// Last day observed by a successful check.
    pub fn get_last_checked_date(&self) -> Option<NaiveDate> {
        *self.mirror_guard()
    }

    pub fn is_detector_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Poll period in effect.
    pub fn poll_interval(&self) -> Duration {
        self.cfg.poll_interval_clamped()
    }

    /// Day check used by the timer and by `initialize`; failures only log.
    async fn run_check(&self, origin: &'static str) {
        match self.check_date().await {
            Ok(DateCheck::Changed {
                previous,
                current,
                report,
            }) => {
                info!(
                    origin,
                    %previous,
                    %current,
                    cleared = report.cleared,
                    failed = report.failed,
                    "daily reset completed"
                );
            }
            Ok(outcome) => debug!(origin, ?outcome, "day check"),
            Err(e) => warn!(
                origin,
                error = %e,
                label = e.as_label(),
                "day check failed; retrying next interval"
            ),
        }
    }

    async fn check_date(&self) -> Result<DateCheck, WatchdogError> {
        let guard = self.check_lock.lock().await;
        let today = self.clock.today();

        if *self.mirror_guard() == Some(today) {
            return Ok(DateCheck::Unchanged { date: today });
        }

        let stored = match self.read_marker().await {
            Ok(stored) => stored,
            Err(WatchdogError::MarkerCorrupt { value }) => {
                warn!(value = %value, "persisted day marker is corrupt; treating as first run");
                None
            }
            Err(e) => return Err(e),
        };

        match stored {
            None => {
                self.write_marker(today).await?;
                self.set_mirror(today);
                info!(date = %today, "day marker initialized");
                Ok(DateCheck::FirstRun { date: today })
            }
            Some(previous) if previous == today => {
                self.set_mirror(today);
                Ok(DateCheck::Unchanged { date: today })
            }
            Some(previous) => {
                if previous > today {
                    warn!(%previous, current = %today, "local clock moved backwards");
                }
                self.write_marker(today).await?;
                self.set_mirror(today);
                drop(guard);

                info!(%previous, current = %today, "calendar day changed");
                let report = self.reset_sequence(today).await;
                Ok(DateCheck::Changed {
                    previous,
                    current: today,
                    report,
                })
            }
        }
    }

    async fn reset_sequence(&self, date: NaiveDate) -> InvalidationReport {
        let report = self.invalidator.invalidate_all().await;
        self.broadcast_reset(date);
        self.broadcast_refresh();
        self.broadcast_cleared(&report);
        report
    }

    fn broadcast_reset(&self, date: NaiveDate) {
        let payload = DailyReset {
            timestamp: self.clock.now(),
            date,
        };
        self.bus
            .publish(EventKind::DailyReset, Payload::DailyReset(payload.clone()));
        for domain in Domain::ALL {
            self.bus
                .publish(domain.reset_event(), Payload::DailyReset(payload.clone()));
        }
    }

    fn broadcast_refresh(&self) {
        for kind in EventKind::REFRESH {
            self.bus.emit(kind);
        }
    }

    fn broadcast_cleared(&self, report: &InvalidationReport) {
        self.bus.publish(
            EventKind::CacheCleared,
            Payload::CacheCleared(CacheCleared {
                timestamp: self.clock.now(),
                cleared_count: report.cleared,
                failed_count: report.failed,
                sweep_skipped: report.sweep_skipped,
            }),
        );
    }

    async fn read_marker(&self) -> Result<Option<NaiveDate>, WatchdogError> {
        let Some(raw) = self.store.get(&self.cfg.marker_key).await? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|_| WatchdogError::MarkerCorrupt { value: raw })
    }

    async fn write_marker(&self, date: NaiveDate) -> Result<(), WatchdogError> {
        let value = date.format("%Y-%m-%d").to_string();
        self.store.set(&self.cfg.marker_key, &value).await?;
        Ok(())
    }

    fn set_mirror(&self, date: NaiveDate) {
        *self.mirror_guard() = Some(date);
    }

    fn mirror_guard(&self) -> MutexGuard<'_, Option<NaiveDate>> {
        self.last_checked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn poll_guard(&self) -> MutexGuard<'_, Option<PollHandle>> {
        self.poll.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DateWatchdog {
    fn drop(&mut self) {
        if let Some(handle) = self.poll_guard().take() {
            handle.token.cancel();
        }
    }
}

impl std::fmt::Debug for DateWatchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateWatchdog")
            .field("initialized", &self.is_detector_initialized())
            .field("last_checked", &self.get_last_checked_date())
            .field("poll_interval", &self.cfg.poll_interval)
            .finish()
    }
}

/// Periodic day check; exits on cancellation or once the watchdog is dropped.
async fn poll_loop(watchdog: Weak<DateWatchdog>, period: Duration, token: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let Some(wd) = watchdog.upgrade() else { break };
                wd.run_check("timer").await;
            }
        }
    }
    debug!("date watchdog poll loop exited");
}
