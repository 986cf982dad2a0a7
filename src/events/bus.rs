//! # Event bus for fanning out freshness events to screens.
//!
//! [`EventBus`] is a synchronous, in-process publish/subscribe table keyed by
//! [`EventKind`]. Publishers (the date watchdog, screens logging data) never
//! know who listens; subscribers never know who published.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                         Subscribers (many, per kind):
//!   DateWatchdog ──┐                           ┌──► callback #1 (registration order)
//!   Screen A     ──┼──► publish(kind) ──► snapshot ──► callback #2
//!   Screen B     ──┘                           └──► callback #N
//! ```
//!
//! ## Rules
//! - **Synchronous dispatch**: `publish()` returns after every callback has been attempted.
//! - **Registration order**: callbacks run in the order they were subscribed.
//! - **Isolation**: a panicking callback is caught and logged; the rest still run.
//! - **Snapshot semantics**: the callback list is copied when dispatch starts, so
//!   callbacks may subscribe or unsubscribe while being dispatched.
//! - **No persistence**: events published with no subscribers are dropped.
//!
//! Subscribers that need async work (re-fetching from the backend) register
//! through [`EventBus::subscribe_async`]; their work is spawned on the tokio
//! runtime and `publish` stays synchronous.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error};

use super::event::{Event, EventKind, Payload};
use crate::subscribers::{Subscribe, spawn_on_event};

/// Handle to a registered callback.
///
/// Identity (`Arc::ptr_eq`) is what [`EventBus::unsubscribe`] matches on, so
/// keep a clone of the `Arc` you subscribed if you intend to remove it later.
pub type Callback = Arc<dyn Fn(&Event) + Send + Sync + 'static>;

/// Wraps a closure into a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// In-process publish/subscribe dispatcher.
///
/// ### Properties
/// - **Fire-and-forget**: `publish` never fails and never panics because of a subscriber.
/// - **No deduplication**: subscribing the same callback twice delivers twice.
/// - **Thread-safe**: the table sits behind a `RwLock` that is never held while callbacks run.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RwLock<HashMap<EventKind, Vec<Callback>>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `cb` for `kind`. Duplicates are allowed and fire independently.
    pub fn subscribe(&self, kind: EventKind, cb: Callback) {
        self.write().entry(kind).or_default().push(cb);
    }

    /// Removes the first registration of `cb` for `kind`.
    ///
    /// Unknown kinds and unregistered callbacks are silently ignored.
    pub fn unsubscribe(&self, kind: EventKind, cb: &Callback) {
        let mut table = self.write();
        let Some(list) = table.get_mut(&kind) else {
            return;
        };
        if let Some(pos) = list.iter().position(|c| Arc::ptr_eq(c, cb)) {
            list.remove(pos);
        }
        if list.is_empty() {
            table.remove(&kind);
        }
    }

    /// Registers an async subscriber for `kind`.
    ///
    /// Each delivery spawns `on_event` on the current tokio runtime; panics
    /// inside the subscriber are caught and logged. Returns the callback
    /// wrapping the subscriber, for use with [`EventBus::unsubscribe`].
    pub fn subscribe_async(&self, kind: EventKind, sub: Arc<dyn Subscribe>) -> Callback {
        let cb = async_callback(sub);
        self.subscribe(kind, Arc::clone(&cb));
        cb
    }

    /// Registers an async subscriber for every [`EventKind`].
    ///
    /// The same callback is registered under each kind.
    pub fn subscribe_async_all(&self, sub: Arc<dyn Subscribe>) -> Callback {
        let cb = async_callback(sub);
        let mut table = self.write();
        for kind in EventKind::ALL {
            table.entry(kind).or_default().push(Arc::clone(&cb));
        }
        cb
    }

    /// Synchronously invokes every callback registered for `kind`, in order.
    ///
    /// No-op when nobody is subscribed.
    pub fn publish(&self, kind: EventKind, payload: Payload) {
        let snapshot: Vec<Callback> = match self.read().get(&kind) {
            Some(list) => list.clone(),
            None => {
                debug!(event = %kind, "no subscribers");
                return;
            }
        };

        let event = Event::new(kind, payload);
        for (idx, cb) in snapshot.iter().enumerate() {
            if let Err(panic_err) = panic::catch_unwind(AssertUnwindSafe(|| cb(&event))) {
                error!(
                    event = %kind,
                    seq = event.seq,
                    subscriber = idx,
                    panic = %panic_message(panic_err.as_ref()),
                    "subscriber panicked; continuing dispatch"
                );
            }
        }
    }

    /// Publishes `kind` without a payload.
    #[inline]
    pub fn emit(&self, kind: EventKind) {
        self.publish(kind, Payload::Empty);
    }

    pub fn meal_logged(&self, meal: serde_json::Value) {
        self.publish(EventKind::MealLogged, Payload::Data(meal));
    }

    pub fn water_logged(&self, entry: serde_json::Value) {
        self.publish(EventKind::WaterLogged, Payload::Data(entry));
    }

    pub fn mood_logged(&self, entry: serde_json::Value) {
        self.publish(EventKind::MoodLogged, Payload::Data(entry));
    }

    pub fn sleep_logged(&self, entry: serde_json::Value) {
        self.publish(EventKind::SleepLogged, Payload::Data(entry));
    }

    pub fn fitness_logged(&self, entry: serde_json::Value) {
        self.publish(EventKind::FitnessLogged, Payload::Data(entry));
    }

    pub fn wellness_activity_logged(&self, activity: serde_json::Value) {
        self.publish(EventKind::WellnessActivityLogged, Payload::Data(activity));
    }

    pub fn mission_completed(&self, mission: serde_json::Value) {
        self.publish(EventKind::MissionCompleted, Payload::Data(mission));
    }

    /// Asks every screen to reload its data.
    pub fn request_data_refresh(&self) {
        self.emit(EventKind::DataRefreshRequested);
    }

    /// Number of registrations for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.read().get(&kind).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        self.subscriber_count(kind) > 0
    }

    /// Drops every subscription. Intended for tests.
    pub fn clear(&self) {
        self.write().clear();
    }

    // A panicking callback never runs under the lock, so poisoning carries no
    // broken invariant.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<EventKind, Vec<Callback>>> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EventKind, Vec<Callback>>> {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.read();
        f.debug_struct("EventBus")
            .field("kinds", &table.len())
            .field("callbacks", &table.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

fn async_callback(sub: Arc<dyn Subscribe>) -> Callback {
    Arc::new(move |ev: &Event| spawn_on_event(Arc::clone(&sub), ev.clone()))
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Callback {
        let log = Arc::clone(log);
        callback(move |ev: &Event| {
            log.lock().unwrap().push(format!("{tag}:{}", ev.kind));
        })
    }

    #[test]
    fn publish_runs_callbacks_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::WaterLogged, recorder(&log, "a"));
        bus.subscribe(EventKind::WaterLogged, recorder(&log, "b"));
        bus.subscribe(EventKind::MoodLogged, recorder(&log, "c"));

        bus.emit(EventKind::WaterLogged);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:waterLogged".to_string(), "b:waterLogged".to_string()]
        );
    }

    #[test]
    fn payload_reaches_every_subscriber() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..2 {
            let seen = Arc::clone(&seen);
            bus.subscribe(
                EventKind::MealLogged,
                callback(move |ev| seen.lock().unwrap().push(ev.payload.clone())),
            );
        }

        bus.meal_logged(json!({ "name": "oatmeal", "calories": 310 }));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for p in seen.iter() {
            assert_eq!(p.as_data(), Some(&json!({ "name": "oatmeal", "calories": 310 })));
        }
    }

    #[test]
    fn panicking_subscriber_does_not_stop_dispatch() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::DailyReset, recorder(&log, "before"));
        bus.subscribe(
            EventKind::DailyReset,
            callback(|_| panic!("screen blew up")),
        );
        bus.subscribe(EventKind::DailyReset, recorder(&log, "after"));

        bus.emit(EventKind::DailyReset);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["before:dailyReset".to_string(), "after:dailyReset".to_string()]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let cb = recorder(&log, "x");
        bus.subscribe(EventKind::SleepLogged, Arc::clone(&cb));
        bus.unsubscribe(EventKind::SleepLogged, &cb);

        bus.emit(EventKind::SleepLogged);

        assert!(log.lock().unwrap().is_empty());
        assert!(!bus.has_subscribers(EventKind::SleepLogged));
    }

    #[test]
    fn unsubscribe_removes_only_first_duplicate() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let cb = recorder(&log, "dup");
        bus.subscribe(EventKind::DataChanged, Arc::clone(&cb));
        bus.subscribe(EventKind::DataChanged, Arc::clone(&cb));
        bus.unsubscribe(EventKind::DataChanged, &cb);

        bus.emit(EventKind::DataChanged);

        assert_eq!(bus.subscriber_count(EventKind::DataChanged), 1);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn unsubscribe_unknown_is_noop() {
        let bus = EventBus::new();
        let cb = callback(|_| {});
        bus.unsubscribe(EventKind::CacheCleared, &cb);
        bus.subscribe(EventKind::CacheCleared, callback(|_| {}));
        bus.unsubscribe(EventKind::CacheCleared, &cb);
        assert_eq!(bus.subscriber_count(EventKind::CacheCleared), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself_during_dispatch() {
        let bus = Arc::new(EventBus::new());
        let hits = Arc::new(Mutex::new(0));
        let slot: Arc<Mutex<Option<Callback>>> = Arc::new(Mutex::new(None));

        let cb = {
            let bus = Arc::clone(&bus);
            let hits = Arc::clone(&hits);
            let slot = Arc::clone(&slot);
            callback(move |_| {
                *hits.lock().unwrap() += 1;
                if let Some(me) = slot.lock().unwrap().take() {
                    bus.unsubscribe(EventKind::ForceRefresh, &me);
                }
            })
        };
        *slot.lock().unwrap() = Some(Arc::clone(&cb));
        bus.subscribe(EventKind::ForceRefresh, cb);

        bus.emit(EventKind::ForceRefresh);
        bus.emit(EventKind::ForceRefresh);

        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.request_data_refresh();
        assert!(!bus.has_subscribers(EventKind::DataRefreshRequested));
    }

    #[test]
    fn clear_drops_everything() {
        let bus = EventBus::new();
        bus.subscribe(EventKind::WaterReset, callback(|_| {}));
        bus.subscribe(EventKind::MoodReset, callback(|_| {}));
        bus.clear();
        assert_eq!(bus.subscriber_count(EventKind::WaterReset), 0);
        assert_eq!(bus.subscriber_count(EventKind::MoodReset), 0);
    }

    struct Forwarder(mpsc::UnboundedSender<EventKind>);

    #[async_trait]
    impl Subscribe for Forwarder {
        async fn on_event(&self, event: &Event) {
            tokio::task::yield_now().await;
            let _ = self.0.send(event.kind);
        }
    }

    struct Exploder;

    #[async_trait]
    impl Subscribe for Exploder {
        async fn on_event(&self, _event: &Event) {
            panic!("async screen blew up");
        }
    }

    #[tokio::test]
    async fn async_subscribers_are_spawned_and_isolated() {
        let bus = EventBus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe_async(EventKind::MissionsReset, Arc::new(Exploder));
        let cb = bus.subscribe_async(EventKind::MissionsReset, Arc::new(Forwarder(tx)));

        bus.emit(EventKind::MissionsReset);
        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(got, Some(EventKind::MissionsReset));

        bus.unsubscribe(EventKind::MissionsReset, &cb);
        assert_eq!(bus.subscriber_count(EventKind::MissionsReset), 1);
    }

    #[tokio::test]
    async fn subscribe_async_all_covers_every_kind() {
        let bus = EventBus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cb = bus.subscribe_async_all(Arc::new(Forwarder(tx)));

        bus.emit(EventKind::SummaryReset);
        bus.mission_completed(json!({ "id": 7 }));

        let mut got = vec![
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
        ];
        got.sort_by_key(|k| k.as_str());
        assert_eq!(got, vec![EventKind::MissionCompleted, EventKind::SummaryReset]);

        for kind in EventKind::ALL {
            bus.unsubscribe(kind, &cb);
        }
        assert!(EventKind::ALL.iter().all(|k| !bus.has_subscribers(*k)));
    }
}
