mod modal;
mod payload;
mod store;

pub use modal::{CloseReason, ModalKind, ModalSlot};
pub use payload::{DropoffCompletion, DropoffSuccessPayload, DropoffType};
pub use store::{ScheduledCheck, SuccessModalState, SuccessModalStore, SuccessTimings};
