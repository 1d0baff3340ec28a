mod evaluator;
mod event;
mod thresholds;

pub use evaluator::{evaluate, evaluate_priority};
pub use event::{MetricSnapshot, MilestoneEvent};
pub use thresholds::{
    MetricKind, CARBON_UNIT_CHECKPOINTS, DROPOFF_COUNT_CHECKPOINTS, MILESTONE_PRIORITY,
};
