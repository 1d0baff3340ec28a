//! Async driver for the success modal store.
//!
//! [`SuccessModalStore`] has no clock of its own. A [`SuccessSession`] owns
//! one for the lifetime of an app session, ticks it from a tokio interval,
//! and forwards every event to a channel the UI listens on.
//!
//! Deferred milestone checks are handed back as a [`CheckGuard`]. Dropping
//! the guard (for example when the page that logged the drop-off unmounts)
//! cancels the check, so no celebration appears after the user left.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::events::{CancelReason, Event};
use crate::milestone::{MetricSnapshot, MilestoneEvent};
use crate::storage::Config;
use crate::success::{
    CloseReason, DropoffCompletion, ModalKind, ScheduledCheck, SuccessModalState,
    SuccessModalStore,
};

/// Wall-clock time derived from tokio's clock, so paused test time drives
/// the store deterministically.
#[derive(Debug, Clone, Copy)]
struct SessionClock {
    started_at: DateTime<Utc>,
    origin: Instant,
}

impl SessionClock {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            origin: Instant::now(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let elapsed =
            Duration::from_std(self.origin.elapsed()).unwrap_or_else(|_| Duration::zero());
        self.started_at + elapsed
    }
}

fn lock(store: &Mutex<SuccessModalStore>) -> MutexGuard<'_, SuccessModalStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn forward(store: &mut SuccessModalStore, events: &mpsc::UnboundedSender<Event>) {
    for event in store.drain_events() {
        // Nobody listening is fine; the store state is still authoritative.
        let _ = events.send(event);
    }
}

/// Session-scoped owner of the success modal store.
pub struct SuccessSession {
    store: Arc<Mutex<SuccessModalStore>>,
    clock: SessionClock,
    events: mpsc::UnboundedSender<Event>,
    ticker: JoinHandle<()>,
}

impl SuccessSession {
    /// Start a session. Must be called from within a tokio runtime.
    pub fn start(config: &Config) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let store = Arc::new(Mutex::new(SuccessModalStore::new(config.timings())));
        let clock = SessionClock::start();
        let (events, rx) = mpsc::unbounded_channel();
        let period = std::time::Duration::from_millis(config.session.tick_interval_ms.max(1));

        let ticker = tokio::spawn({
            let store = Arc::clone(&store);
            let events = events.clone();
            async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    let mut store = lock(&store);
                    store.tick(clock.now());
                    forward(&mut store, &events);
                }
            }
        });
        debug!(?period, "success session started");

        (
            Self {
                store,
                clock,
                events,
                ticker,
            },
            rx,
        )
    }

    /// Run `f` against the store after catching up on due timers, then
    /// publish whatever it changed.
    fn with_store<R>(&self, f: impl FnOnce(&mut SuccessModalStore, DateTime<Utc>) -> R) -> R {
        let now = self.clock.now();
        let mut store = lock(&self.store);
        store.tick(now);
        let out = f(&mut store, now);
        forward(&mut store, &self.events);
        out
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn snapshot(&self) -> SuccessModalState {
        self.with_store(|store, _| store.snapshot())
    }

    /// Earliest pending auto-dismiss or milestone check, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.with_store(|store, _| store.next_deadline())
    }

    /// Show drop-off feedback now; the returned guard owns the deferred
    /// milestone check, if one was scheduled.
    pub fn trigger_dropoff_success(&self, completion: &DropoffCompletion) -> Option<CheckGuard> {
        let check = self.with_store(|store, now| store.trigger_dropoff_success(completion, now))?;
        Some(CheckGuard {
            check,
            store: Arc::downgrade(&self.store),
            clock: self.clock,
            events: self.events.clone(),
            armed: true,
        })
    }

    pub fn show_milestone_success(&self, milestone: MilestoneEvent) {
        self.with_store(|store, now| store.show_milestone_success(milestone, now));
    }

    pub fn check_milestones(&self, current: MetricSnapshot, previous: MetricSnapshot) -> bool {
        self.with_store(|store, now| store.check_milestones(current, previous, now))
    }

    pub fn dismiss(&self, modal: ModalKind, reason: CloseReason) {
        self.with_store(|store, now| store.dismiss(modal, reason, now));
    }

    pub fn close_all(&self) {
        self.with_store(|store, now| store.close_all(now));
    }
}

impl Drop for SuccessSession {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

/// Owns a scheduled milestone check and cancels it on drop.
#[must_use = "dropping the guard cancels the milestone check; call `detach` to keep it"]
pub struct CheckGuard {
    check: ScheduledCheck,
    store: Weak<Mutex<SuccessModalStore>>,
    clock: SessionClock,
    events: mpsc::UnboundedSender<Event>,
    armed: bool,
}

impl CheckGuard {
    pub fn check(&self) -> ScheduledCheck {
        self.check
    }

    /// Let the check run even after this guard is gone.
    pub fn detach(mut self) {
        self.armed = false;
    }
}

impl Drop for CheckGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Some(store) = self.store.upgrade() else {
            return;
        };
        let mut store = lock(&store);
        let now = self.clock.now();
        // Timers due before the scope ended still fire.
        store.tick(now);
        store.cancel_milestone_check(self.check.id, CancelReason::ScopeEnded, now);
        forward(&mut store, &self.events);
    }
}
