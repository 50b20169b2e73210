use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tally_core::TrackerOptions;
use tally_infrastructure::{TallyPaths, load_config};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tally - per-group message activity ledger", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overriding the config file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Also write daily-rotated logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read inbound events as JSON lines on stdin, write replies to stdout
    Run,
    /// Talk to the bot as a user in a private chat
    Console {
        /// Acting user id
        #[arg(long)]
        user: i64,
        /// Acting username
        #[arg(long)]
        username: Option<String>,
    },
    /// Fold the journal into the documents and exit
    Compact,
    /// Print the registered groups
    Groups,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Console { .. } => "warn",
        _ => "info",
    };
    let _log_guard = logging::init(cli.log_dir.as_deref(), default_level)?;

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let data_dir = TallyPaths::resolve_data_dir(cli.data_dir.as_deref(), &config)
        .context("Failed to resolve data directory")?;
    let options = TrackerOptions::from(&config);

    match cli.command {
        Commands::Run => commands::run::execute(&data_dir, options).await?,
        Commands::Console { user, username } => {
            commands::console::execute(&data_dir, options, user, username)?
        }
        Commands::Compact => commands::maintenance::compact(&data_dir, options)?,
        Commands::Groups => commands::maintenance::groups(&data_dir, options)?,
    }

    Ok(())
}
