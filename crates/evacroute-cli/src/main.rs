use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

use commands::route::RouteCommandArgs;
use commands::shelters::SheltersCommandArgs;
use commands::SourceArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hazard-aware evacuation route planning")]
struct Cli {
    /// Road network snapshot (JSON). Defaults to the built-in sample network.
    #[arg(long, global = true, env = "EVACROUTE_NETWORK")]
    network: Option<PathBuf>,

    /// Hazard zone list (JSON array) applied before routing.
    #[arg(long, global = true, env = "EVACROUTE_HAZARDS")]
    hazards: Option<PathBuf>,

    /// Engine configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the evacuation route from a location to the nearest shelter with room.
    Route(RouteCommandArgs),
    /// List shelters and their spare capacity.
    Shelters(SheltersCommandArgs),
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let sources = SourceArgs {
        network: cli.network,
        hazards: cli.hazards,
        config: cli.config,
    };

    match cli.command {
        Command::Route(args) => commands::route::handle_route(&sources, &args, cli.format),
        Command::Shelters(args) => {
            commands::shelters::handle_shelters(&sources, &args, cli.format)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
