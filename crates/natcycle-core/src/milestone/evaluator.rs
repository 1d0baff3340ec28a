//! Milestone evaluation.
//!
//! A checkpoint `t` is *newly crossed* when `previous < t <= new`. Only the
//! lowest newly crossed checkpoint is reported, so a jump from 8 to 30 carbon
//! units celebrates 10 and leaves 25 uncelebrated.

use super::event::{MetricSnapshot, MilestoneEvent};
use super::thresholds::{MetricKind, MILESTONE_PRIORITY};

/// Compare two values of one metric against its checkpoint table.
///
/// Returns `None` when nothing was newly crossed; that is the common case.
pub fn evaluate(metric: MetricKind, previous: f64, new: f64) -> Option<MilestoneEvent> {
    metric
        .checkpoints()
        .iter()
        .copied()
        .find(|&t| new >= f64::from(t) && previous < f64::from(t))
        .map(|t| MilestoneEvent::threshold(metric, new, t))
}

/// Evaluate every metric in [`MILESTONE_PRIORITY`] order and stop at the
/// first hit. Metrics after the hit are not looked at in this pass.
pub fn evaluate_priority(
    previous: &MetricSnapshot,
    current: &MetricSnapshot,
) -> Option<MilestoneEvent> {
    MILESTONE_PRIORITY
        .iter()
        .find_map(|&metric| evaluate(metric, previous.value(metric), current.value(metric)))
}
