//! # NatCycle Core Library
//!
//! Success feedback for the NatCycle recycling app: after a drop-off the user
//! sees a confirmation, and shortly afterwards a celebration if the drop-off
//! pushed their carbon units or drop-off count past a milestone checkpoint.
//!
//! ## Architecture
//!
//! - **Milestones**: fixed checkpoint tables and a pure evaluator that reports
//!   the lowest newly crossed checkpoint, metrics checked in priority order
//! - **Success store**: two independent modal slots with auto-dismiss
//!   deadlines and one cancellable deferred milestone check, driven by
//!   caller-supplied time
//! - **Session**: tokio driver that owns the store for an app session and
//!   streams its events
//! - **Presentation**: modal copy with generic fallbacks, share-intent links
//!
//! ## Key Components
//!
//! - [`SuccessModalStore`]: modal state machine and drop-off choreography
//! - [`SuccessSession`]: async owner of the store
//! - [`evaluate`]: milestone evaluator
//! - [`Config`]: application configuration

pub mod error;
pub mod events;
pub mod milestone;
pub mod present;
pub mod session;
pub mod share;
pub mod storage;
pub mod success;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{CancelReason, Event};
pub use milestone::{evaluate, evaluate_priority, MetricKind, MetricSnapshot, MilestoneEvent};
pub use present::{DropoffSuccessView, MilestoneView};
pub use session::{CheckGuard, SuccessSession};
pub use share::{share_url, SharePlatform};
pub use storage::Config;
pub use success::{
    CloseReason, DropoffCompletion, DropoffSuccessPayload, DropoffType, ModalKind, ModalSlot,
    ScheduledCheck, SuccessModalState, SuccessModalStore, SuccessTimings,
};
