use serde::{Deserialize, Serialize};

use super::thresholds::MetricKind;

/// A milestone worth celebrating.
///
/// Threshold milestones come out of the evaluator; badge milestones are
/// granted elsewhere and handed straight to the success modal store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MilestoneEvent {
    CarbonUnits {
        current_value: f64,
        crossed_threshold: u32,
    },
    DropoffCount {
        current_value: f64,
        crossed_threshold: u32,
    },
    BadgeEarned {
        badge_name: String,
    },
}

impl MilestoneEvent {
    pub fn threshold(metric: MetricKind, current_value: f64, crossed_threshold: u32) -> Self {
        match metric {
            MetricKind::CarbonUnits => MilestoneEvent::CarbonUnits {
                current_value,
                crossed_threshold,
            },
            MetricKind::DropoffCount => MilestoneEvent::DropoffCount {
                current_value,
                crossed_threshold,
            },
        }
    }

    pub fn badge(badge_name: impl Into<String>) -> Self {
        MilestoneEvent::BadgeEarned {
            badge_name: badge_name.into(),
        }
    }

    /// The metric this milestone belongs to (`None` for badges).
    pub fn metric(&self) -> Option<MetricKind> {
        match self {
            MilestoneEvent::CarbonUnits { .. } => Some(MetricKind::CarbonUnits),
            MilestoneEvent::DropoffCount { .. } => Some(MetricKind::DropoffCount),
            MilestoneEvent::BadgeEarned { .. } => None,
        }
    }

    pub fn crossed_threshold(&self) -> Option<u32> {
        match self {
            MilestoneEvent::CarbonUnits {
                crossed_threshold, ..
            }
            | MilestoneEvent::DropoffCount {
                crossed_threshold, ..
            } => Some(*crossed_threshold),
            MilestoneEvent::BadgeEarned { .. } => None,
        }
    }

    pub fn current_value(&self) -> Option<f64> {
        match self {
            MilestoneEvent::CarbonUnits { current_value, .. }
            | MilestoneEvent::DropoffCount { current_value, .. } => Some(*current_value),
            MilestoneEvent::BadgeEarned { .. } => None,
        }
    }
}

/// Cumulative metric values at one point in time.
///
/// The default (all zeros) stands in for "no prior snapshot".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub carbon_units: f64,
    pub dropoff_count: f64,
}

impl MetricSnapshot {
    pub fn new(carbon_units: f64, dropoff_count: f64) -> Self {
        Self {
            carbon_units,
            dropoff_count,
        }
    }

    /// Per-metric minimum of two snapshots.
    pub fn floor(&self, other: &MetricSnapshot) -> MetricSnapshot {
        MetricSnapshot {
            carbon_units: self.carbon_units.min(other.carbon_units),
            dropoff_count: self.dropoff_count.min(other.dropoff_count),
        }
    }

    pub fn value(&self, metric: MetricKind) -> f64 {
        match metric {
            MetricKind::CarbonUnits => self.carbon_units,
            MetricKind::DropoffCount => self.dropoff_count,
        }
    }
}
