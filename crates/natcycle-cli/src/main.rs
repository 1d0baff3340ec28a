use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "natcycle-cli", version, about = "NatCycle CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the milestone checkpoint tables
    Thresholds,
    /// Evaluate one metric change against its checkpoints
    Evaluate(commands::milestone::EvaluateArgs),
    /// Check both metrics in priority order
    Check(commands::milestone::CheckArgs),
    /// Show a badge milestone
    Badge(commands::milestone::BadgeArgs),
    /// Run the drop-off success choreography
    Simulate(commands::simulate::SimulateArgs),
    /// Build a share link for a milestone
    Share(commands::share::ShareArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Thresholds => commands::milestone::thresholds(),
        Commands::Evaluate(args) => commands::milestone::evaluate(args),
        Commands::Check(args) => commands::milestone::check(args),
        Commands::Badge(args) => commands::milestone::badge(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Share(args) => commands::share::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
