// Exchange Simulator - CLI
// Single entry point for interactive sessions and non-interactive replays

use clap::{Parser, Subcommand};
use tracing::{error, info};

use exchange_sim::Config;

// Load command modules from cli directory
#[path = "../cli/session_commands.rs"]
mod session_commands;

#[derive(Parser)]
#[command(name = "exchange-sim")]
#[command(version = "0.1.0")]
#[command(about = "Currency exchange replay simulator", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the default configuration file
    Init,

    /// Run an interactive session over the configured data file
    Run,

    /// Replay time steps without interaction
    Replay {
        /// Number of time steps to process
        #[arg(short, long, default_value = "10")]
        steps: usize,

        /// Write a JSON report of trades and final balances
        #[arg(short, long)]
        report: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging first (before config load so we can see config errors)
    let log_level = if cli.verbose { "debug" } else { "info" };
    std::env::set_var("RUST_LOG", log_level);
    tracing_subscriber::fmt::init();

    match cli.command {
        // Init doesn't require config (it creates it)
        Commands::Init => {
            let config = Config::load_or_create(&cli.config)?;
            info!("config ready: replaying {}", config.data.csv_path);
        }

        Commands::Run => {
            let config = load_config_or_exit(&cli.config)?;
            session_commands::run_interactive(&config)?;
        }

        Commands::Replay { steps, report } => {
            let config = load_config_or_exit(&cli.config)?;
            session_commands::run_replay(&config, steps, report.as_deref())?;
        }
    }

    Ok(())
}

fn load_config_or_exit(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    match Config::from_file(path) {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("failed to load {}: {}", path, e);
            error!("run `exchange-sim init` to create a default configuration");
            Err(e.into())
        }
    }
}
