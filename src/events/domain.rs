//! Tracked per-day domains.
//!
//! Each domain owns a reset event and a cache-key prefix. Screens subscribe to
//! the reset event of the domain they render instead of filtering the generic
//! [`EventKind::DailyReset`].

use super::event::EventKind;

/// A metric family whose cached values are only valid for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Water,
    Fitness,
    Sleep,
    Mood,
    Meals,
    Wellness,
    Missions,
    Summary,
}

impl Domain {
    /// All domains, in the order their reset events are published.
    pub const ALL: [Domain; 8] = [
        Domain::Water,
        Domain::Fitness,
        Domain::Sleep,
        Domain::Mood,
        Domain::Meals,
        Domain::Wellness,
        Domain::Missions,
        Domain::Summary,
    ];

    /// Event published for this domain during a daily reset.
    pub fn reset_event(self) -> EventKind {
        match self {
            Domain::Water => EventKind::WaterReset,
            Domain::Fitness => EventKind::FitnessReset,
            Domain::Sleep => EventKind::SleepReset,
            Domain::Mood => EventKind::MoodReset,
            Domain::Meals => EventKind::MealsReset,
            Domain::Wellness => EventKind::WellnessReset,
            Domain::Missions => EventKind::MissionsReset,
            Domain::Summary => EventKind::SummaryReset,
        }
    }

    /// Key prefix used by screens of this domain (matched by the sweep).
    pub fn key_prefix(self) -> &'static str {
        match self {
            Domain::Water => "water",
            Domain::Fitness => "fitness",
            Domain::Sleep => "sleep",
            Domain::Mood => "mood",
            Domain::Meals => "meal",
            Domain::Wellness => "wellness",
            Domain::Missions => "mission",
            Domain::Summary => "summary",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn reset_events_are_distinct() {
        let kinds: HashSet<_> = Domain::ALL.iter().map(|d| d.reset_event()).collect();
        assert_eq!(kinds.len(), Domain::ALL.len());
        assert!(!kinds.contains(&EventKind::DailyReset));
    }
}
