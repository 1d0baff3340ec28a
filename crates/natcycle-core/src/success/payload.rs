use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::milestone::MetricSnapshot;

/// How the drop-off was logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropoffType {
    #[default]
    Regular,
    Simple,
    Campaign,
}

impl std::str::FromStr for DropoffType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(DropoffType::Regular),
            "simple" => Ok(DropoffType::Simple),
            "campaign" => Ok(DropoffType::Campaign),
            other => Err(format!("unknown drop-off type: {other}")),
        }
    }
}

/// What the drop-off success modal shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropoffSuccessPayload {
    #[serde(default)]
    pub material_type: String,
    #[serde(default)]
    pub carbon_units_earned: f64,
    #[serde(default)]
    pub dropoff_type: DropoffType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
}

/// Everything a page knows once a drop-off has been accepted.
///
/// The metric snapshots are optional; without both `new_*` values no
/// milestone check is scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropoffCompletion {
    #[serde(default)]
    pub material_type: String,
    #[serde(default)]
    pub carbon_units_earned: f64,
    #[serde(default)]
    pub dropoff_type: DropoffType,
    #[serde(default)]
    pub campaign_name: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub previous_carbon_units: Option<f64>,
    #[serde(default)]
    pub previous_dropoff_count: Option<f64>,
    #[serde(default)]
    pub new_carbon_units: Option<f64>,
    #[serde(default)]
    pub new_dropoff_count: Option<f64>,
}

impl DropoffCompletion {
    pub fn new(
        material_type: impl Into<String>,
        carbon_units_earned: f64,
        dropoff_type: DropoffType,
    ) -> Self {
        Self {
            material_type: material_type.into(),
            carbon_units_earned,
            dropoff_type,
            campaign_name: None,
            location_name: None,
            previous_carbon_units: None,
            previous_dropoff_count: None,
            new_carbon_units: None,
            new_dropoff_count: None,
        }
    }

    pub fn with_campaign(mut self, name: impl Into<String>) -> Self {
        self.campaign_name = Some(name.into());
        self
    }

    pub fn with_location(mut self, name: impl Into<String>) -> Self {
        self.location_name = Some(name.into());
        self
    }

    pub fn with_metrics(mut self, previous: Option<MetricSnapshot>, new: MetricSnapshot) -> Self {
        self.previous_carbon_units = previous.map(|p| p.carbon_units);
        self.previous_dropoff_count = previous.map(|p| p.dropoff_count);
        self.new_carbon_units = Some(new.carbon_units);
        self.new_dropoff_count = Some(new.dropoff_count);
        self
    }

    /// The drop-off-shaped subset shown in the success modal.
    pub fn payload(&self) -> DropoffSuccessPayload {
        DropoffSuccessPayload {
            material_type: self.material_type.clone(),
            carbon_units_earned: self.carbon_units_earned,
            dropoff_type: self.dropoff_type,
            campaign_name: self.campaign_name.clone(),
            location_name: self.location_name.clone(),
        }
    }

    /// `(previous, current)` snapshots for the deferred milestone check.
    ///
    /// `None` unless both new values are present. Missing previous values
    /// count as zero.
    pub fn milestone_snapshots(&self) -> Option<(MetricSnapshot, MetricSnapshot)> {
        let current = MetricSnapshot::new(self.new_carbon_units?, self.new_dropoff_count?);
        let previous = MetricSnapshot::new(
            self.previous_carbon_units.unwrap_or(0.0),
            self.previous_dropoff_count.unwrap_or(0.0),
        );
        Some((previous, current))
    }

    /// Reject negative or non-finite metric values.
    ///
    /// The store itself tolerates anything; this is for input boundaries
    /// such as the CLI.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("carbonUnitsEarned", Some(self.carbon_units_earned)),
            ("previousCarbonUnits", self.previous_carbon_units),
            ("previousDropoffCount", self.previous_dropoff_count),
            ("newCarbonUnits", self.new_carbon_units),
            ("newDropoffCount", self.new_dropoff_count),
        ];
        for (name, value) in fields {
            match value {
                Some(v) if !v.is_finite() => {
                    return Err(ValidationError::InvalidValue {
                        field: name.to_string(),
                        message: format!("must be a finite number, got {v}"),
                    });
                }
                Some(v) if v < 0.0 => {
                    return Err(ValidationError::NegativeMetric {
                        metric: name.to_string(),
                        value: v,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
