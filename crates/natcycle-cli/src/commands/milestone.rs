use chrono::Utc;
use clap::Args;
use natcycle_core::milestone::MILESTONE_PRIORITY;
use natcycle_core::{MetricKind, MetricSnapshot, MilestoneEvent, MilestoneView, SuccessModalStore};
use serde_json::json;

use super::{non_negative, print_json};

#[derive(Args)]
pub struct EvaluateArgs {
    /// Metric kind (carbon-units | dropoff-count)
    metric: MetricKind,
    /// Value before the action
    previous: f64,
    /// Value after the action
    new: f64,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Carbon units after the action
    #[arg(long)]
    carbon: f64,
    /// Drop-off count after the action
    #[arg(long)]
    dropoffs: f64,
    /// Carbon units before the action
    #[arg(long, default_value = "0")]
    prev_carbon: f64,
    /// Drop-off count before the action
    #[arg(long, default_value = "0")]
    prev_dropoffs: f64,
}

#[derive(Args)]
pub struct BadgeArgs {
    /// Badge name
    name: String,
}

pub fn thresholds() -> Result<(), Box<dyn std::error::Error>> {
    let tables: Vec<_> = MILESTONE_PRIORITY
        .iter()
        .enumerate()
        .map(|(priority, metric)| {
            json!({
                "metric": metric,
                "priority": priority,
                "checkpoints": metric.checkpoints(),
            })
        })
        .collect();
    print_json(&tables)
}

pub fn evaluate(args: EvaluateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let previous = non_negative("previous", args.previous)?;
    let new = non_negative("new", args.new)?;
    print_json(&natcycle_core::evaluate(args.metric, previous, new))
}

pub fn check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let current = MetricSnapshot::new(
        non_negative("carbon", args.carbon)?,
        non_negative("dropoffs", args.dropoffs)?,
    );
    let previous = MetricSnapshot::new(
        non_negative("prev-carbon", args.prev_carbon)?,
        non_negative("prev-dropoffs", args.prev_dropoffs)?,
    );

    let mut store = SuccessModalStore::default();
    let fired = store.check_milestones(current, previous, Utc::now());
    let milestone = store.state().milestone.data();
    print_json(&json!({
        "fired": fired,
        "milestone": milestone,
        "view": fired.then(|| MilestoneView::from_event(milestone)),
    }))
}

pub fn badge(args: BadgeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SuccessModalStore::default();
    store.show_milestone_success(MilestoneEvent::badge(args.name), Utc::now());
    let view = MilestoneView::from_event(store.state().milestone.data());
    let events = store.drain_events();
    print_json(&json!({
        "state": store.snapshot(),
        "view": view,
        "events": events,
    }))
}
