//! Milestone checkpoint tables.
//!
//! Keep every table strictly ascending: the evaluator scans them in order and
//! reports the first checkpoint that was newly crossed.

use serde::{Deserialize, Serialize};

/// Cumulative carbon units checkpoints.
pub const CARBON_UNIT_CHECKPOINTS: &[u32] = &[10, 25, 50, 100, 250, 500, 1000];

/// Cumulative drop-off count checkpoints.
pub const DROPOFF_COUNT_CHECKPOINTS: &[u32] = &[1, 5, 10, 25, 50, 100];

/// Metrics that carry milestone checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    CarbonUnits,
    DropoffCount,
}

/// Order in which metrics are checked after a drop-off. The first metric that
/// crossed a checkpoint wins; later metrics are not evaluated in that pass.
pub const MILESTONE_PRIORITY: &[MetricKind] = &[MetricKind::CarbonUnits, MetricKind::DropoffCount];

impl MetricKind {
    pub fn checkpoints(self) -> &'static [u32] {
        match self {
            MetricKind::CarbonUnits => CARBON_UNIT_CHECKPOINTS,
            MetricKind::DropoffCount => DROPOFF_COUNT_CHECKPOINTS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::CarbonUnits => "carbon_units",
            MetricKind::DropoffCount => "dropoff_count",
        }
    }

    /// Unit noun for user-facing copy, pluralised for `value`.
    pub fn unit_label(self, value: u32) -> &'static str {
        match (self, value) {
            (MetricKind::CarbonUnits, _) => "Carbon Units",
            (MetricKind::DropoffCount, 1) => "drop-off",
            (MetricKind::DropoffCount, _) => "drop-offs",
        }
    }

    /// Smallest checkpoint strictly above `value`, if any remain.
    pub fn next_checkpoint(self, value: f64) -> Option<u32> {
        self.checkpoints()
            .iter()
            .copied()
            .find(|&t| value < f64::from(t))
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "carbon_units" | "carbon" => Ok(MetricKind::CarbonUnits),
            "dropoff_count" | "dropoffs" => Ok(MetricKind::DropoffCount),
            other => Err(format!("unknown metric kind: {other}")),
        }
    }
}
