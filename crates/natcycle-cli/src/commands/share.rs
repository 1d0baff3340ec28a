use clap::Args;
use natcycle_core::{share_url, Config, MetricKind, MilestoneEvent, MilestoneView, SharePlatform};

#[derive(Args)]
pub struct ShareArgs {
    /// Platform (twitter | facebook | linkedin | whatsapp)
    platform: SharePlatform,
    /// Metric whose checkpoint was reached
    #[arg(long, requires = "threshold", conflicts_with = "badge")]
    metric: Option<MetricKind>,
    /// Checkpoint that was reached
    #[arg(long, requires = "metric")]
    threshold: Option<u32>,
    /// Badge that was earned
    #[arg(long)]
    badge: Option<String>,
}

pub fn run(args: ShareArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let milestone = match (args.metric, args.threshold, args.badge) {
        (Some(metric), Some(threshold), _) => {
            Some(MilestoneEvent::threshold(metric, f64::from(threshold), threshold))
        }
        (_, _, Some(badge)) => Some(MilestoneEvent::badge(badge)),
        _ => None,
    };
    let view = MilestoneView::from_event(milestone.as_ref());

    let url = share_url(args.platform, &view.share_text, &config.share)?;
    println!("{url}");
    Ok(())
}
