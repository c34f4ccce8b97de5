mod cli;
mod commands;
mod config;
mod error;
mod logging;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::logging::LogSettings;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\nError: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&LogSettings::from_cli(&cli))?;

    info!("metapool CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }

    let command_result = match cli.command {
        Commands::Normalize(args) => {
            info!("Dispatching to 'normalize' command.");
            commands::normalize::run(args)
        }
        Commands::Pool(args) => {
            info!("Dispatching to 'pool' command.");
            commands::pool::run(args)
        }
        Commands::Index(args) => {
            info!("Dispatching to 'index' command.");
            commands::index::run(args)
        }
        Commands::Reformat(args) => {
            info!("Dispatching to 'reformat' command.");
            commands::reformat::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }

    command_result
}
