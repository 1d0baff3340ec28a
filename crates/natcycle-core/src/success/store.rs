//! Success modal store.
//!
//! Holds the drop-off and milestone success slots, their auto-dismiss
//! deadlines, and at most one deferred milestone check. Like the rest of the
//! core it has no internal clock: every mutation takes `now`, and the caller
//! advances time with [`SuccessModalStore::tick`].
//!
//! ## Drop-off choreography
//!
//! ```text
//! t=0      trigger_dropoff_success -> drop-off modal opens, check scheduled
//! t=5000   drop-off modal auto-dismisses (unless closed earlier)
//! t=6000   milestone check runs -> milestone modal opens if a checkpoint was crossed
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::modal::{CloseReason, ModalKind, ModalSlot};
use super::payload::{DropoffCompletion, DropoffSuccessPayload};
use crate::events::{CancelReason, Event};
use crate::milestone::{evaluate_priority, MetricSnapshot, MilestoneEvent};

/// Delays that drive the success choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessTimings {
    pub dropoff_auto_close: Duration,
    /// Zero keeps the milestone modal open until dismissed.
    pub milestone_auto_close: Duration,
    pub check_delay: Duration,
}

impl SuccessTimings {
    pub fn from_millis(
        dropoff_auto_close: u64,
        milestone_auto_close: u64,
        check_delay: u64,
    ) -> Self {
        Self {
            dropoff_auto_close: millis(dropoff_auto_close),
            milestone_auto_close: millis(milestone_auto_close),
            check_delay: millis(check_delay),
        }
    }
}

impl Default for SuccessTimings {
    fn default() -> Self {
        Self::from_millis(5000, 0, 6000)
    }
}

fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

/// Handle to a scheduled milestone check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledCheck {
    pub id: Uuid,
    pub due_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct PendingCheck {
    id: Uuid,
    due_at: DateTime<Utc>,
    previous: MetricSnapshot,
    current: MetricSnapshot,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuccessModalState {
    pub dropoff: ModalSlot<DropoffSuccessPayload>,
    pub milestone: ModalSlot<MilestoneEvent>,
}

#[derive(Debug, Clone, Copy)]
enum Timer {
    DropoffAutoClose,
    MilestoneAutoClose,
    MilestoneCheck,
}

#[derive(Debug, Default)]
pub struct SuccessModalStore {
    state: SuccessModalState,
    timings: SuccessTimings,
    pending: Option<PendingCheck>,
    outbox: Vec<Event>,
}

impl SuccessModalStore {
    pub fn new(timings: SuccessTimings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SuccessModalState {
        &self.state
    }

    pub fn snapshot(&self) -> SuccessModalState {
        self.state.clone()
    }

    pub fn timings(&self) -> SuccessTimings {
        self.timings
    }

    pub fn pending_check(&self) -> Option<ScheduledCheck> {
        self.pending.as_ref().map(|p| ScheduledCheck {
            id: p.id,
            due_at: p.due_at,
        })
    }

    /// Earliest instant at which `tick` would change something.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers().into_iter().flatten().map(|(at, _)| at).min()
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn show_dropoff_success(&mut self, payload: DropoffSuccessPayload, now: DateTime<Utc>) {
        let replaced = self
            .state
            .dropoff
            .open(payload, now, self.timings.dropoff_auto_close);
        self.opened(ModalKind::DropoffSuccess, replaced, now);
    }

    /// Open the milestone modal. Badge milestones come straight here.
    pub fn show_milestone_success(&mut self, milestone: MilestoneEvent, now: DateTime<Utc>) {
        info!(?milestone, "milestone reached");
        self.outbox.push(Event::MilestoneReached {
            milestone: milestone.clone(),
            at: now,
        });
        let replaced = self
            .state
            .milestone
            .open(milestone, now, self.timings.milestone_auto_close);
        self.opened(ModalKind::MilestoneSuccess, replaced, now);
    }

    pub fn close_dropoff_success(&mut self, now: DateTime<Utc>) {
        self.close(ModalKind::DropoffSuccess, CloseReason::Programmatic, now);
    }

    pub fn close_milestone_success(&mut self, now: DateTime<Utc>) {
        self.close(ModalKind::MilestoneSuccess, CloseReason::Programmatic, now);
    }

    pub fn close_all(&mut self, now: DateTime<Utc>) {
        self.close_dropoff_success(now);
        self.close_milestone_success(now);
    }

    /// User-initiated close (close button or backdrop click).
    pub fn dismiss(&mut self, modal: ModalKind, reason: CloseReason, now: DateTime<Utc>) {
        self.close(modal, reason, now);
    }

    /// Compare snapshots in priority order and open the milestone modal for
    /// the first newly crossed checkpoint. Returns whether one fired.
    pub fn check_milestones(
        &mut self,
        current: MetricSnapshot,
        previous: MetricSnapshot,
        now: DateTime<Utc>,
    ) -> bool {
        match evaluate_priority(&previous, &current) {
            Some(milestone) => {
                self.show_milestone_success(milestone, now);
                true
            }
            None => false,
        }
    }

    /// Show drop-off feedback now and, if the completion carries both new
    /// metric values, schedule a milestone check after the check delay.
    ///
    /// A check still pending from an earlier drop-off is superseded; its
    /// baseline carries over so nothing crossed in between is lost.
    pub fn trigger_dropoff_success(
        &mut self,
        completion: &DropoffCompletion,
        now: DateTime<Utc>,
    ) -> Option<ScheduledCheck> {
        self.show_dropoff_success(completion.payload(), now);

        let (mut previous, current) = completion.milestone_snapshots()?;
        if let Some(old) = self.pending.take() {
            // Checkpoints crossed since the superseded baseline still count.
            previous = previous.floor(&old.previous);
            self.cancelled(old.id, CancelReason::Superseded, now);
        }

        let check = PendingCheck {
            id: Uuid::new_v4(),
            due_at: now
                .checked_add_signed(self.timings.check_delay)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            previous,
            current,
        };
        debug!(check_id = %check.id, due_at = %check.due_at, "milestone check scheduled");
        self.outbox.push(Event::MilestoneCheckScheduled {
            check_id: check.id,
            due_at: check.due_at,
            at: now,
        });
        let handle = ScheduledCheck {
            id: check.id,
            due_at: check.due_at,
        };
        self.pending = Some(check);
        Some(handle)
    }

    /// Cancel a pending check. Returns `false` if `id` is not pending
    /// (already ran, superseded, or never existed).
    pub fn cancel_milestone_check(
        &mut self,
        id: Uuid,
        reason: CancelReason,
        now: DateTime<Utc>,
    ) -> bool {
        match self.pending.take() {
            Some(pending) if pending.id == id => {
                self.cancelled(pending.id, reason, now);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Fire every timer due by `now`, earliest first, each at its own
    /// deadline.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        while let Some((at, timer)) = self
            .timers()
            .into_iter()
            .flatten()
            .filter(|&(at, _)| at <= now)
            .min_by_key(|&(at, _)| at)
        {
            match timer {
                Timer::DropoffAutoClose => {
                    self.close(ModalKind::DropoffSuccess, CloseReason::AutoDismiss, at)
                }
                Timer::MilestoneAutoClose => {
                    self.close(ModalKind::MilestoneSuccess, CloseReason::AutoDismiss, at)
                }
                Timer::MilestoneCheck => self.run_pending_check(at),
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Armed timers in tie-break order: closes before the check.
    fn timers(&self) -> [Option<(DateTime<Utc>, Timer)>; 3] {
        [
            self.state
                .dropoff
                .auto_close_at()
                .map(|at| (at, Timer::DropoffAutoClose)),
            self.state
                .milestone
                .auto_close_at()
                .map(|at| (at, Timer::MilestoneAutoClose)),
            self.pending
                .as_ref()
                .map(|p| (p.due_at, Timer::MilestoneCheck)),
        ]
    }

    fn run_pending_check(&mut self, at: DateTime<Utc>) {
        let Some(check) = self.pending.take() else {
            return;
        };
        let fired = self.check_milestones(check.current, check.previous, at);
        debug!(check_id = %check.id, fired, "milestone check completed");
        self.outbox.push(Event::MilestoneCheckCompleted {
            check_id: check.id,
            fired,
            at,
        });
    }

    fn close(&mut self, modal: ModalKind, reason: CloseReason, now: DateTime<Utc>) {
        let was_open = match modal {
            ModalKind::DropoffSuccess => self.state.dropoff.close(),
            ModalKind::MilestoneSuccess => self.state.milestone.close(),
        };
        if was_open {
            debug!(?modal, ?reason, "modal closed");
            self.outbox.push(Event::ModalClosed {
                modal,
                reason,
                at: now,
            });
        }
    }

    fn opened(&mut self, modal: ModalKind, replaced: bool, now: DateTime<Utc>) {
        let auto_close_at = match modal {
            ModalKind::DropoffSuccess => self.state.dropoff.auto_close_at(),
            ModalKind::MilestoneSuccess => self.state.milestone.auto_close_at(),
        };
        debug!(?modal, replaced, "modal opened");
        self.outbox.push(Event::ModalOpened {
            modal,
            replaced,
            auto_close_at,
            at: now,
        });
    }

    fn cancelled(&mut self, check_id: Uuid, reason: CancelReason, now: DateTime<Utc>) {
        debug!(%check_id, ?reason, "milestone check cancelled");
        self.outbox.push(Event::MilestoneCheckCancelled {
            check_id,
            reason,
            at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milestone::MetricKind;
    use crate::success::DropoffType;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-04-22T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    fn payload() -> DropoffSuccessPayload {
        DropoffCompletion::new("plastic", 5.0, DropoffType::Simple).payload()
    }

    fn closes(events: &[Event], modal: ModalKind) -> Vec<(CloseReason, DateTime<Utc>)> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::ModalClosed {
                    modal: m,
                    reason,
                    at,
                } if *m == modal => Some((*reason, *at)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn show_then_close_dropoff() {
        let mut store = SuccessModalStore::default();
        store.show_dropoff_success(payload(), t0());
        assert!(store.state().dropoff.is_open());
        assert_eq!(store.state().dropoff.data(), Some(&payload()));

        store.close_dropoff_success(t0());
        assert!(!store.state().dropoff.is_open());
        assert_eq!(store.state().dropoff.data(), None);

        store.close_dropoff_success(t0());
        assert!(!store.state().dropoff.is_open());

        let events = store.drain_events();
        assert_eq!(events.len(), 2, "second close must be a no-op");
    }

    #[test]
    fn show_while_open_replaces_payload() {
        let mut store = SuccessModalStore::default();
        store.show_dropoff_success(payload(), t0());
        let mut other = payload();
        other.material_type = "glass".into();
        store.show_dropoff_success(other.clone(), t0() + ms(100));
        assert_eq!(store.state().dropoff.data(), Some(&other));

        let events = store.drain_events();
        assert!(matches!(events[1], Event::ModalOpened { replaced: true, .. }));
    }

    #[test]
    fn slots_are_independent() {
        let mut store = SuccessModalStore::default();
        store.show_dropoff_success(payload(), t0());
        store.show_milestone_success(MilestoneEvent::badge("Eco Starter"), t0());
        assert!(store.state().dropoff.is_open());
        assert!(store.state().milestone.is_open());

        store.close_milestone_success(t0());
        assert!(store.state().dropoff.is_open());
        assert!(!store.state().milestone.is_open());

        store.show_milestone_success(MilestoneEvent::badge("Eco Starter"), t0());
        store.close_all(t0());
        assert_eq!(store.snapshot(), SuccessModalState::default());
    }

    #[test]
    fn auto_dismiss_fires_once() {
        let mut store = SuccessModalStore::default();
        store.show_dropoff_success(payload(), t0());

        store.tick(t0() + ms(4999));
        assert!(store.state().dropoff.is_open());

        store.tick(t0() + ms(5000));
        assert!(!store.state().dropoff.is_open());

        store.tick(t0() + ms(10_000));
        let events = store.drain_events();
        assert_eq!(
            closes(&events, ModalKind::DropoffSuccess),
            vec![(CloseReason::AutoDismiss, t0() + ms(5000))]
        );
    }

    #[test]
    fn manual_close_cancels_auto_dismiss() {
        let mut store = SuccessModalStore::default();
        store.show_dropoff_success(payload(), t0());
        store.dismiss(ModalKind::DropoffSuccess, CloseReason::CloseButton, t0() + ms(2000));
        assert_eq!(store.next_deadline(), None);

        store.tick(t0() + ms(5000));
        let events = store.drain_events();
        assert_eq!(
            closes(&events, ModalKind::DropoffSuccess),
            vec![(CloseReason::CloseButton, t0() + ms(2000))]
        );
    }

    #[test]
    fn reopen_does_not_inherit_stale_deadline() {
        let mut store = SuccessModalStore::default();
        store.show_dropoff_success(payload(), t0());
        store.dismiss(ModalKind::DropoffSuccess, CloseReason::Backdrop, t0() + ms(1000));
        store.show_dropoff_success(payload(), t0() + ms(4000));

        store.tick(t0() + ms(5000));
        assert!(store.state().dropoff.is_open(), "old deadline must not close the new modal");
        store.tick(t0() + ms(9000));
        assert!(!store.state().dropoff.is_open());
    }

    #[test]
    fn check_milestones_prefers_carbon_units() {
        let mut store = SuccessModalStore::default();
        let fired = store.check_milestones(
            MetricSnapshot::new(10.0, 1.0),
            MetricSnapshot::new(0.0, 0.0),
            t0(),
        );
        assert!(fired);
        let shown = store.state().milestone.data().unwrap();
        assert_eq!(shown.metric(), Some(MetricKind::CarbonUnits));
        assert_eq!(shown.crossed_threshold(), Some(10));

        let reached: Vec<_> = store
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, Event::MilestoneReached { .. }))
            .collect();
        assert_eq!(reached.len(), 1);
    }

    #[test]
    fn check_milestones_without_match() {
        let mut store = SuccessModalStore::default();
        assert!(!store.check_milestones(
            MetricSnapshot::new(30.0, 3.0),
            MetricSnapshot::new(26.0, 2.0),
            t0(),
        ));
        assert!(!store.state().milestone.is_open());
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn badge_always_opens_milestone_modal() {
        let mut store = SuccessModalStore::default();
        store.show_milestone_success(MilestoneEvent::badge("Glass Guardian"), t0());
        assert_eq!(
            store.state().milestone.data(),
            Some(&MilestoneEvent::badge("Glass Guardian"))
        );
    }

    #[test]
    fn trigger_without_metrics_schedules_nothing() {
        let mut store = SuccessModalStore::default();
        let completion = DropoffCompletion::new("paper", 2.0, DropoffType::Regular);
        assert!(store.trigger_dropoff_success(&completion, t0()).is_none());
        assert!(store.state().dropoff.is_open());
        assert!(store.pending_check().is_none());
    }

    #[test]
    fn trigger_runs_check_after_delay() {
        let mut store = SuccessModalStore::default();
        let completion = DropoffCompletion::new("plastic", 5.0, DropoffType::Simple)
            .with_metrics(Some(MetricSnapshot::new(5.0, 0.0)), MetricSnapshot::new(10.0, 1.0));
        let check = store.trigger_dropoff_success(&completion, t0()).unwrap();
        assert_eq!(check.due_at, t0() + ms(6000));

        store.tick(t0() + ms(5999));
        assert!(!store.state().milestone.is_open());

        store.tick(t0() + ms(6000));
        assert!(store.state().milestone.is_open());
        assert!(store.pending_check().is_none());
    }

    #[test]
    fn coarse_tick_fires_timers_in_order() {
        let mut store = SuccessModalStore::new(SuccessTimings::from_millis(5000, 3000, 6000));
        let completion = DropoffCompletion::new("plastic", 5.0, DropoffType::Simple)
            .with_metrics(None, MetricSnapshot::new(12.0, 1.0));
        store.trigger_dropoff_success(&completion, t0());
        store.drain_events();

        store.tick(t0() + ms(60_000));
        let kinds: Vec<_> = store
            .drain_events()
            .into_iter()
            .map(|e| match e {
                Event::ModalClosed { modal, at, .. } => {
                    format!("close:{modal:?}@{}", (at - t0()).num_milliseconds())
                }
                Event::ModalOpened { modal, at, .. } => {
                    format!("open:{modal:?}@{}", (at - t0()).num_milliseconds())
                }
                Event::MilestoneReached { .. } => "reached".to_string(),
                Event::MilestoneCheckCompleted { fired, .. } => format!("checked:{fired}"),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "close:DropoffSuccess@5000",
                "reached",
                "open:MilestoneSuccess@6000",
                "checked:true",
                "close:MilestoneSuccess@9000",
            ]
        );
    }

    #[test]
    fn newer_trigger_supersedes_pending_check() {
        let mut store = SuccessModalStore::default();
        let first = DropoffCompletion::new("plastic", 5.0, DropoffType::Simple).with_metrics(
            Some(MetricSnapshot::new(12.0, 2.0)),
            MetricSnapshot::new(14.0, 3.0),
        );
        let second = DropoffCompletion::new("paper", 1.0, DropoffType::Simple).with_metrics(
            Some(MetricSnapshot::new(14.0, 3.0)),
            MetricSnapshot::new(15.0, 4.0),
        );
        let a = store.trigger_dropoff_success(&first, t0()).unwrap();
        let b = store.trigger_dropoff_success(&second, t0() + ms(1000)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.pending_check(), Some(b));

        store.tick(t0() + ms(20_000));
        assert!(!store.state().milestone.is_open());
        let events = store.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::MilestoneCheckCancelled {
                check_id,
                reason: CancelReason::Superseded,
                ..
            } if *check_id == a.id
        )));
        let completed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::MilestoneCheckCompleted { check_id, .. } => Some(*check_id),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![b.id]);
    }

    #[test]
    fn superseding_check_keeps_earlier_baseline() {
        let mut store = SuccessModalStore::default();
        let first = DropoffCompletion::new("plastic", 10.0, DropoffType::Simple)
            .with_metrics(None, MetricSnapshot::new(10.0, 1.0));
        let second = DropoffCompletion::new("paper", 2.0, DropoffType::Simple).with_metrics(
            Some(MetricSnapshot::new(10.0, 1.0)),
            MetricSnapshot::new(12.0, 2.0),
        );
        store.trigger_dropoff_success(&first, t0());
        let check = store.trigger_dropoff_success(&second, t0() + ms(1000)).unwrap();
        assert_eq!(check.due_at, t0() + ms(7000));

        store.tick(t0() + ms(60_000));
        let shown = store.state().milestone.data().unwrap();
        assert_eq!(shown.metric(), Some(MetricKind::CarbonUnits));
        assert_eq!(shown.crossed_threshold(), Some(10));
        assert_eq!(shown.current_value(), Some(12.0));
    }

    #[test]
    fn huge_delays_never_overflow() {
        let huge = 10_000_000_000_000_000;
        let mut store = SuccessModalStore::new(SuccessTimings::from_millis(huge, huge, huge));
        let completion = DropoffCompletion::new("plastic", 5.0, DropoffType::Simple)
            .with_metrics(None, MetricSnapshot::new(10.0, 1.0));

        let check = store.trigger_dropoff_success(&completion, t0()).unwrap();
        assert_eq!(check.due_at, DateTime::<Utc>::MAX_UTC);
        store.show_milestone_success(MilestoneEvent::badge("Eco Starter"), t0());
        assert!(store.state().milestone.is_open());

        store.tick(t0() + ms(60_000));
        assert!(store.state().dropoff.is_open());
        assert!(store.pending_check().is_some());
    }

    #[test]
    fn cancelled_check_never_opens_modal() {
        let mut store = SuccessModalStore::default();
        let completion = DropoffCompletion::new("plastic", 5.0, DropoffType::Simple)
            .with_metrics(None, MetricSnapshot::new(10.0, 1.0));
        let check = store.trigger_dropoff_success(&completion, t0()).unwrap();

        assert!(store.cancel_milestone_check(check.id, CancelReason::ScopeEnded, t0() + ms(100)));
        assert!(!store.cancel_milestone_check(check.id, CancelReason::ScopeEnded, t0() + ms(200)));

        store.tick(t0() + ms(6000));
        assert!(!store.state().milestone.is_open());
    }

    #[test]
    fn cancel_with_unknown_id_keeps_pending_check() {
        let mut store = SuccessModalStore::default();
        let completion = DropoffCompletion::new("plastic", 5.0, DropoffType::Simple)
            .with_metrics(None, MetricSnapshot::new(10.0, 1.0));
        let check = store.trigger_dropoff_success(&completion, t0()).unwrap();
        assert!(!store.cancel_milestone_check(Uuid::new_v4(), CancelReason::Explicit, t0()));
        assert_eq!(store.pending_check(), Some(check));
    }
}
