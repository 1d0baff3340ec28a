use chrono::Utc;
use clap::Args;
use natcycle_core::{
    Config, DropoffCompletion, DropoffSuccessView, DropoffType, Event, SuccessModalState,
    SuccessModalStore, SuccessSession,
};

#[derive(Args)]
pub struct SimulateArgs {
    /// Material dropped off
    #[arg(long, default_value = "plastic")]
    material: String,
    /// Carbon units earned by this drop-off
    #[arg(long, default_value = "0")]
    carbon_earned: f64,
    /// Drop-off type (regular | simple | campaign)
    #[arg(long, default_value = "regular")]
    dropoff_type: DropoffType,
    #[arg(long)]
    campaign: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    prev_carbon: Option<f64>,
    #[arg(long)]
    prev_dropoffs: Option<f64>,
    #[arg(long)]
    new_carbon: Option<f64>,
    #[arg(long)]
    new_dropoffs: Option<f64>,
    /// Wait in real time instead of stepping a simulated clock
    #[arg(long)]
    realtime: bool,
}

impl SimulateArgs {
    fn completion(&self) -> DropoffCompletion {
        DropoffCompletion {
            material_type: self.material.clone(),
            carbon_units_earned: self.carbon_earned,
            dropoff_type: self.dropoff_type,
            campaign_name: self.campaign.clone(),
            location_name: self.location.clone(),
            previous_carbon_units: self.prev_carbon,
            previous_dropoff_count: self.prev_dropoffs,
            new_carbon_units: self.new_carbon,
            new_dropoff_count: self.new_dropoffs,
        }
    }
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let completion = args.completion();
    completion.validate()?;

    let final_state = if args.realtime {
        run_realtime(&config, &completion)?
    } else {
        run_simulated(&config, &completion)?
    };

    let view = DropoffSuccessView::from_payload(Some(&completion.payload()));
    println!(
        "{}",
        serde_json::to_string(&serde_json::json!({
            "type": "Summary",
            "dropoff_view": view,
            "state": final_state,
        }))?
    );
    Ok(())
}

/// Step from deadline to deadline until nothing is scheduled.
fn run_simulated(
    config: &Config,
    completion: &DropoffCompletion,
) -> Result<SuccessModalState, Box<dyn std::error::Error>> {
    let mut store = SuccessModalStore::new(config.timings());
    store.trigger_dropoff_success(completion, Utc::now());

    loop {
        for event in store.drain_events() {
            print_event(&event)?;
        }
        match store.next_deadline() {
            Some(deadline) => store.tick(deadline),
            None => break,
        }
    }
    Ok(store.snapshot())
}

fn run_realtime(
    config: &Config,
    completion: &DropoffCompletion,
) -> Result<SuccessModalState, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let tick = std::time::Duration::from_millis(config.session.tick_interval_ms);

    runtime.block_on(async {
        let (session, mut rx) = SuccessSession::start(config);
        let guard = session.trigger_dropoff_success(completion);

        loop {
            while let Ok(event) = rx.try_recv() {
                print_event(&event)?;
            }
            if session.next_deadline().is_none() {
                break;
            }
            tokio::time::sleep(tick).await;
        }
        while let Ok(event) = rx.try_recv() {
            print_event(&event)?;
        }

        // The check has run by now; dropping the guard is a no-op.
        drop(guard);
        Ok::<_, Box<dyn std::error::Error>>(session.snapshot())
    })
}
