//! One success modal slot and its auto-dismiss deadline.
//!
//! ## State Transitions
//!
//! ```text
//! Closed -> Open (show) -> Closed (close button | backdrop | auto-dismiss | programmatic)
//! ```
//!
//! The payload lives inside the slot, so an open slot always has data and a
//! closed slot never does. Closing by any path drops the deadline with it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    DropoffSuccess,
    MilestoneSuccess,
}

/// Why a modal closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    CloseButton,
    Backdrop,
    AutoDismiss,
    /// Closed by code, e.g. `close_all` on navigation.
    Programmatic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalSlot<T> {
    data: Option<T>,
    auto_close_at: Option<DateTime<Utc>>,
}

impl<T> Default for ModalSlot<T> {
    fn default() -> Self {
        Self {
            data: None,
            auto_close_at: None,
        }
    }
}

impl<T> ModalSlot<T> {
    pub fn is_open(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn auto_close_at(&self) -> Option<DateTime<Utc>> {
        self.auto_close_at
    }

    /// Open with `data`, replacing any current payload. A zero or negative
    /// `auto_close`, or one past the end of representable time, disables
    /// auto-dismiss. Returns `true` if a payload was replaced.
    pub(crate) fn open(&mut self, data: T, now: DateTime<Utc>, auto_close: Duration) -> bool {
        let replaced = self.data.replace(data).is_some();
        self.auto_close_at = if auto_close > Duration::zero() {
            now.checked_add_signed(auto_close)
        } else {
            None
        };
        replaced
    }

    /// Returns `true` if the slot was open.
    pub(crate) fn close(&mut self) -> bool {
        self.auto_close_at = None;
        self.data.take().is_some()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotView<'a, T> {
    is_open: bool,
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_close_at: Option<DateTime<Utc>>,
}

impl<T: Serialize> Serialize for ModalSlot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SlotView {
            is_open: self.is_open(),
            data: self.data.as_ref(),
            auto_close_at: self.auto_close_at,
        }
        .serialize(serializer)
    }
}
