use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::milestone::MilestoneEvent;
use crate::success::{CloseReason, ModalKind};

/// Every state change in the success modal store produces an Event.
/// The presentation layer polls for events; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ModalOpened {
        modal: ModalKind,
        /// A payload was already showing and got replaced.
        replaced: bool,
        auto_close_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
    ModalClosed {
        modal: ModalKind,
        reason: CloseReason,
        at: DateTime<Utc>,
    },
    MilestoneReached {
        milestone: MilestoneEvent,
        at: DateTime<Utc>,
    },
    MilestoneCheckScheduled {
        check_id: Uuid,
        due_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    MilestoneCheckCancelled {
        check_id: Uuid,
        reason: CancelReason,
        at: DateTime<Utc>,
    },
    MilestoneCheckCompleted {
        check_id: Uuid,
        fired: bool,
        at: DateTime<Utc>,
    },
}

/// Why a deferred milestone check did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// A newer drop-off scheduled its own check.
    Superseded,
    /// The page that triggered the check went away.
    ScopeEnded,
    Explicit,
}
