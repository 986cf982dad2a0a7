//! Calendar-day sources.
//!
//! The watchdog only ever asks for "today" in the device's local timezone and
//! for a timestamp to stamp payloads with. [`SystemClock`] answers from the
//! wall clock; [`ManualClock`] is set by hand (tests, demos, simulators).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Days, Local, NaiveDate, Utc};

/// Source of the current local calendar day.
pub trait Clock: Send + Sync + 'static {
    /// Current local calendar day (no time-of-day component).
    fn today(&self) -> NaiveDate;

    /// Timestamp attached to reset and invalidation payloads.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock in the device's local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock whose day only changes when told to.
#[derive(Debug)]
pub struct ManualClock {
    today: Mutex<NaiveDate>,
    reads: AtomicUsize,
}

impl ManualClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
            reads: AtomicUsize::new(0),
        }
    }

    /// Moves the clock to `date` (backwards is allowed).
    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().unwrap_or_else(PoisonError::into_inner) = date;
    }

    /// Moves the clock forward by `days`, saturating at the last representable day.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap_or_else(PoisonError::into_inner);
        *today = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    }

    /// How many times [`Clock::today`] has been called.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        self.reads.fetch_add(1, Ordering::Relaxed);
        *self.today.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_across_month_end() {
        let clock = ManualClock::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        clock.set(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(clock.reads(), 2);
    }
}
