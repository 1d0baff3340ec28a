//! User-facing copy for the success modals.
//!
//! Views never fail: missing or odd data (an empty material name, a NaN
//! carbon figure, no payload at all) falls back to generic copy.

use serde::Serialize;

use crate::milestone::{MetricKind, MilestoneEvent};
use crate::success::{DropoffSuccessPayload, DropoffType};

const GENERIC_DROPOFF_TITLE: &str = "Drop-off logged!";
const GENERIC_DROPOFF_MESSAGE: &str = "Thanks for recycling with NatCycle.";
const GENERIC_MILESTONE_TITLE: &str = "Milestone reached!";
const GENERIC_MILESTONE_MESSAGE: &str = "You're making a real difference. Keep it up!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropoffSuccessView {
    pub title: String,
    pub message: String,
    pub details: Vec<String>,
}

impl DropoffSuccessView {
    pub fn from_payload(payload: Option<&DropoffSuccessPayload>) -> Self {
        let Some(payload) = payload else {
            return Self::generic();
        };

        let material = non_empty(&payload.material_type);
        let title = match payload.dropoff_type {
            DropoffType::Campaign => "Campaign drop-off complete!".to_string(),
            DropoffType::Regular | DropoffType::Simple => GENERIC_DROPOFF_TITLE.to_string(),
        };

        let earned = payload.carbon_units_earned;
        let message = match (material, earned.is_finite() && earned > 0.0) {
            (Some(m), true) => format!(
                "Your {m} drop-off earned {} Carbon Units.",
                format_amount(earned)
            ),
            (None, true) => format!("You earned {} Carbon Units.", format_amount(earned)),
            (Some(m), false) => format!("Your {m} drop-off has been recorded."),
            (None, false) => GENERIC_DROPOFF_MESSAGE.to_string(),
        };

        let mut details = Vec::new();
        if let Some(campaign) = payload.campaign_name.as_deref().and_then(non_empty) {
            details.push(format!("Campaign: {campaign}"));
        }
        if let Some(location) = payload.location_name.as_deref().and_then(non_empty) {
            details.push(format!("Location: {location}"));
        }

        Self {
            title,
            message,
            details,
        }
    }

    fn generic() -> Self {
        Self {
            title: GENERIC_DROPOFF_TITLE.to_string(),
            message: GENERIC_DROPOFF_MESSAGE.to_string(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneView {
    pub emoji: &'static str,
    pub title: String,
    pub message: String,
    /// Ready-made text for the share buttons.
    pub share_text: String,
}

impl MilestoneView {
    pub fn from_event(event: Option<&MilestoneEvent>) -> Self {
        match event {
            Some(MilestoneEvent::BadgeEarned { badge_name }) => match non_empty(badge_name) {
                Some(name) => Self {
                    emoji: "🏅",
                    title: "New badge earned!".to_string(),
                    message: format!("You've earned the {name} badge."),
                    share_text: format!("I just earned the {name} badge on NatCycle!"),
                },
                None => Self {
                    emoji: "🏅",
                    title: "New badge earned!".to_string(),
                    message: "You've earned a new badge.".to_string(),
                    share_text: "I just earned a new badge on NatCycle!".to_string(),
                },
            },
            Some(event) => match (event.metric(), event.crossed_threshold()) {
                (Some(metric), Some(threshold)) => {
                    Self::threshold(metric, threshold, event.current_value())
                }
                _ => Self::generic(),
            },
            None => Self::generic(),
        }
    }

    fn threshold(metric: MetricKind, threshold: u32, current: Option<f64>) -> Self {
        let unit = metric.unit_label(threshold);
        let (emoji, title, message, share_text) = match metric {
            MetricKind::CarbonUnits => (
                "🌱",
                format!("{threshold} {unit}!"),
                format!("You've saved {threshold} {unit} by recycling."),
                format!("I've saved {threshold} {unit} recycling with NatCycle!"),
            ),
            MetricKind::DropoffCount if threshold == 1 => (
                "♻️",
                "First drop-off!".to_string(),
                "You've completed your first drop-off. Welcome aboard!".to_string(),
                "I just made my first recycling drop-off with NatCycle!".to_string(),
            ),
            MetricKind::DropoffCount => (
                "♻️",
                format!("{threshold} {unit}!"),
                format!("You've completed {threshold} {unit}."),
                format!("I've completed {threshold} recycling {unit} with NatCycle!"),
            ),
        };

        let message = match current.and_then(|c| metric.next_checkpoint(c)) {
            Some(next) => format!("{message} Next goal: {next}."),
            None => message,
        };

        Self {
            emoji,
            title,
            message,
            share_text,
        }
    }

    fn generic() -> Self {
        Self {
            emoji: "🎉",
            title: GENERIC_MILESTONE_TITLE.to_string(),
            message: GENERIC_MILESTONE_MESSAGE.to_string(),
            share_text: "I just hit a recycling milestone on NatCycle!".to_string(),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Whole numbers without a decimal point, otherwise one decimal place.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
