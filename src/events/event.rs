//! # Events published on the freshness bus.
//!
//! The [`EventKind`] enum classifies event types across four groups:
//! - **Data events**: a screen logged something (meal, water, mood, ...)
//! - **Reset events**: the calendar day advanced (generic and per-domain)
//! - **Refresh events**: subscribers should re-fetch from the backend
//! - **Diagnostic events**: outcome of a cache invalidation pass
//!
//! The [`Event`] struct carries the kind, a sequence number, an emission
//! timestamp and a [`Payload`].
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use daywatch::{Event, EventKind, Payload};
//!
//! let ev = Event::new(EventKind::WaterLogged, Payload::Empty);
//! assert_eq!(ev.kind.as_str(), "waterLogged");
//! assert!(ev.payload.is_empty());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of bus events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    // === Data events ===
    /// A meal entry was logged.
    MealLogged,
    /// A water intake entry was logged.
    WaterLogged,
    /// A mood entry was logged.
    MoodLogged,
    /// A sleep entry was logged.
    SleepLogged,
    /// A workout or step count was logged.
    FitnessLogged,
    /// A wellness activity was completed.
    WellnessActivityLogged,
    /// A mission was completed.
    MissionCompleted,
    /// A screen asked every other screen to refresh.
    DataRefreshRequested,

    // === Reset events ===
    /// The calendar day changed. Payload: [`Payload::DailyReset`].
    DailyReset,
    WaterReset,
    FitnessReset,
    SleepReset,
    MoodReset,
    MealsReset,
    WellnessReset,
    MissionsReset,
    SummaryReset,

    // === Refresh events ===
    /// Subscribers must drop derived state and reload.
    ForceRefresh,
    /// Subscribers must reload from the backend rather than local cache.
    RefreshFromSource,
    /// Something changed; subscribers that do not care why may reload.
    DataChanged,

    // === Diagnostic events ===
    /// An invalidation pass finished. Payload: [`Payload::CacheCleared`].
    CacheCleared,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 21] = [
        EventKind::MealLogged,
        EventKind::WaterLogged,
        EventKind::MoodLogged,
        EventKind::SleepLogged,
        EventKind::FitnessLogged,
        EventKind::WellnessActivityLogged,
        EventKind::MissionCompleted,
        EventKind::DataRefreshRequested,
        EventKind::DailyReset,
        EventKind::WaterReset,
        EventKind::FitnessReset,
        EventKind::SleepReset,
        EventKind::MoodReset,
        EventKind::MealsReset,
        EventKind::WellnessReset,
        EventKind::MissionsReset,
        EventKind::SummaryReset,
        EventKind::ForceRefresh,
        EventKind::RefreshFromSource,
        EventKind::DataChanged,
        EventKind::CacheCleared,
    ];

    /// Refresh events, in the order the reset sequence publishes them.
    pub const REFRESH: [EventKind; 3] = [
        EventKind::ForceRefresh,
        EventKind::RefreshFromSource,
        EventKind::DataChanged,
    ];

    /// Stable wire-style name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::MealLogged => "mealLogged",
            EventKind::WaterLogged => "waterLogged",
            EventKind::MoodLogged => "moodLogged",
            EventKind::SleepLogged => "sleepLogged",
            EventKind::FitnessLogged => "fitnessLogged",
            EventKind::WellnessActivityLogged => "wellnessActivityLogged",
            EventKind::MissionCompleted => "missionCompleted",
            EventKind::DataRefreshRequested => "dataRefreshRequested",
            EventKind::DailyReset => "dailyReset",
            EventKind::WaterReset => "waterReset",
            EventKind::FitnessReset => "fitnessReset",
            EventKind::SleepReset => "sleepReset",
            EventKind::MoodReset => "moodReset",
            EventKind::MealsReset => "mealsReset",
            EventKind::WellnessReset => "wellnessReset",
            EventKind::MissionsReset => "missionsReset",
            EventKind::SummaryReset => "summaryReset",
            EventKind::ForceRefresh => "forceRefresh",
            EventKind::RefreshFromSource => "refreshFromSource",
            EventKind::DataChanged => "dataChanged",
            EventKind::CacheCleared => "cacheCleared",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a [`EventKind::DailyReset`] and of every per-domain reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReset {
    /// When the reset was triggered.
    pub timestamp: DateTime<Utc>,
    /// The new calendar day.
    pub date: NaiveDate,
}

/// Payload of [`EventKind::CacheCleared`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheCleared {
    /// When the invalidation pass finished.
    pub timestamp: DateTime<Utc>,
    /// Keys whose deletion succeeded.
    pub cleared_count: usize,
    /// Keys whose deletion failed.
    pub failed_count: usize,
    /// The prefix sweep could not list the store; matching keys may remain.
    pub sweep_skipped: bool,
}

/// Data attached to an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Payload {
    /// No payload.
    Empty,
    DailyReset(DailyReset),
    CacheCleared(CacheCleared),
    /// Screen-defined data (e.g. the logged meal).
    Data(serde_json::Value),
}

impl Payload {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// Returns the reset payload, if this is one.
    pub fn as_daily_reset(&self) -> Option<&DailyReset> {
        match self {
            Payload::DailyReset(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the invalidation outcome, if this is one.
    pub fn as_cache_cleared(&self) -> Option<&CacheCleared> {
        match self {
            Payload::CacheCleared(p) => Some(p),
            _ => None,
        }
    }

    /// Returns screen-defined data, if any.
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Data(v) => Some(v),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Data(value)
    }
}

/// Bus event with payload.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Attached data.
    pub payload: Payload,
}

impl Event {
    /// Creates a new event with current timestamp and next sequence number.
    pub fn new(kind: EventKind, payload: Payload) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            payload,
        }
    }

    #[inline]
    pub fn is_reset(&self) -> bool {
        matches!(
            self.kind,
            EventKind::DailyReset
                | EventKind::WaterReset
                | EventKind::FitnessReset
                | EventKind::SleepReset
                | EventKind::MoodReset
                | EventKind::MealsReset
                | EventKind::WellnessReset
                | EventKind::MissionsReset
                | EventKind::SummaryReset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::DataChanged, Payload::Empty);
        let b = Event::new(EventKind::DataChanged, Payload::Empty);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn names_match_serde_names() {
        for kind in EventKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn cache_cleared_payload_serializes_camel_case() {
        let payload = Payload::CacheCleared(CacheCleared {
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
            cleared_count: 3,
            failed_count: 1,
            sweep_skipped: true,
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "cacheCleared");
        assert_eq!(json["data"]["clearedCount"], 3);
        assert_eq!(json["data"]["failedCount"], 1);
        assert_eq!(json["data"]["sweepSkipped"], true);
    }
}
