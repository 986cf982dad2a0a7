//! # Watchdog configuration.
//!
//! Provides [`WatchdogConfig`] centralized settings for the date watchdog and
//! its cache invalidation passes.
//!
//! ## Sentinel values
//! - `poll_interval = 0s` → clamped to 1ms (a zero tokio interval panics)
//! - the marker key is always protected, whether or not it is listed in `protected_keys`

use std::time::Duration;

use crate::events::Domain;

/// Store key holding the last observed calendar day (`YYYY-MM-DD`).
pub const DEFAULT_MARKER_KEY: &str = "@daywatch/lastObservedDate";

/// Default check period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Known per-day cache keys written by screens.
pub const DEFAULT_EXPLICIT_KEYS: &[&str] = &[
    // today's totals
    "todayWaterTotal",
    "todayWaterLogs",
    "todaySleepHours",
    "todayFitnessMinutes",
    "todayStepCount",
    "todayCaloriesBurned",
    "todayMood",
    "todayMeals",
    "todayCalories",
    "todayMacros",
    "todayMissionProgress",
    "todayWellnessActivities",
    "todaySummary",
    // recent lists
    "recentMeals",
    "recentWaterLogs",
    "recentMoodEntries",
    // last-synced markers
    "lastWaterSyncDate",
    "lastSleepSyncDate",
    "lastFitnessSyncDate",
    "lastMoodSyncDate",
    "lastMealSyncDate",
    "lastMissionSyncDate",
    "lastWellnessSyncDate",
    "lastSummarySyncDate",
    // form drafts
    "mealFormDraft",
    "waterFormDraft",
    "moodFormDraft",
    "sleepFormDraft",
    // aggregates
    "dailyProgressCache",
    "dashboardCache",
    "homeScreenCache",
];

/// Generic prefixes swept in addition to every [`Domain::key_prefix`].
pub const DEFAULT_SWEEP_PREFIXES: &[&str] = &["today", "last", "cache", "api", "daily", "recent"];

/// Configuration for the [`DateWatchdog`](crate::DateWatchdog).
///
/// ## Field semantics
/// - `poll_interval`: period of the automatic day check
/// - `marker_key`: store key of the persisted day marker
/// - `explicit_keys`: keys deleted one by one on every invalidation
/// - `sweep_prefixes`: ASCII case-insensitive key prefixes deleted by the sweep
/// - `protected_keys`: keys neither pass may delete (auth tokens, settings)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct WatchdogConfig {
    /// How often the day check runs while initialized.
    pub poll_interval: Duration,

    /// Store key of the persisted last observed day.
    pub marker_key: String,

    /// Known per-day cache keys.
    pub explicit_keys: Vec<String>,

    /// Prefixes matched by the safety-net sweep.
    pub sweep_prefixes: Vec<String>,

    /// Keys never deleted, even when a prefix matches.
    pub protected_keys: Vec<String>,
}

impl WatchdogConfig {
    /// Returns the poll interval clamped to a minimum of 1ms.
    #[inline]
    pub fn poll_interval_clamped(&self) -> Duration {
        self.poll_interval.max(Duration::from_millis(1))
    }

    /// True for the marker key and every configured protected key.
    pub fn is_protected(&self, key: &str) -> bool {
        key == self.marker_key || self.protected_keys.iter().any(|k| k == key)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_marker_key(mut self, key: impl Into<String>) -> Self {
        self.marker_key = key.into();
        self
    }

    /// Adds keys to the explicit list.
    pub fn with_explicit_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Adds sweep prefixes.
    pub fn with_sweep_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sweep_prefixes
            .extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Adds keys that must survive every invalidation.
    pub fn with_protected_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected_keys.extend(keys.into_iter().map(Into::into));
        self
    }
}

impl Default for WatchdogConfig {
    /// Default configuration:
    ///
    /// - `poll_interval = 60s`
    /// - `marker_key = "@daywatch/lastObservedDate"`
    /// - `explicit_keys = DEFAULT_EXPLICIT_KEYS`
    /// - `sweep_prefixes = DEFAULT_SWEEP_PREFIXES` plus each domain prefix
    /// - `protected_keys = []`
    fn default() -> Self {
        let sweep_prefixes = DEFAULT_SWEEP_PREFIXES
            .iter()
            .copied()
            .chain(Domain::ALL.iter().map(|d| d.key_prefix()))
            .map(String::from)
            .collect();

        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            marker_key: DEFAULT_MARKER_KEY.to_string(),
            explicit_keys: DEFAULT_EXPLICIT_KEYS.iter().map(|k| k.to_string()).collect(),
            sweep_prefixes,
            protected_keys: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_always_protected() {
        let cfg = WatchdogConfig::default().with_marker_key("marker");
        assert!(cfg.is_protected("marker"));
        assert!(!cfg.is_protected(DEFAULT_MARKER_KEY));
        assert!(!cfg.is_protected("todayMood"));
    }

    #[test]
    fn default_marker_escapes_default_sweep() {
        let cfg = WatchdogConfig::default();
        let marker = cfg.marker_key.to_ascii_lowercase();
        assert!(
            cfg.sweep_prefixes
                .iter()
                .all(|p| !marker.starts_with(&p.to_ascii_lowercase()))
        );
    }

    #[test]
    fn zero_interval_is_clamped() {
        let cfg = WatchdogConfig::default().with_poll_interval(Duration::ZERO);
        assert_eq!(cfg.poll_interval_clamped(), Duration::from_millis(1));
    }

    #[test]
    fn default_sweep_covers_every_domain() {
        let cfg = WatchdogConfig::default();
        for d in Domain::ALL {
            assert!(cfg.sweep_prefixes.iter().any(|p| p == d.key_prefix()));
        }
    }
}
