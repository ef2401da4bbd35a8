//! rusty-curves CLI - maintain the Treasury discount factor history
//!
//! ## Example Usage
//!
//! ```bash
//! # Append new dates (default when no command is given)
//! FRED_API_KEY=... rusty-curves update
//!
//! # Rebuild everything from the epoch
//! FRED_API_KEY=... rusty-curves generate
//!
//! # Show the last stored date
//! rusty-curves last-update
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rusty_curves::config::{Settings, SourceConfig};
use rusty_curves::data::sources::FredClient;
use rusty_curves::service::ZeroCurveService;
use rusty_curves::store::CurveStore;
use std::path::PathBuf;
use std::process;

/// rusty-curves: Treasury zero curve history
#[derive(Parser)]
#[command(name = "rusty-curves")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and update Treasury discount factor history", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding discount_factors.csv
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the full history from the epoch
    Generate,

    /// Append dates after the last stored date
    Update,

    /// Print the most recent stored date
    LastUpdate,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    let store = CurveStore::from_config(&settings.store_config());

    if cli.verbose {
        println!(
            "{} v{}",
            "rusty-curves".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("Store: {}", store.path().display().to_string().dimmed());
    }

    match cli.command.unwrap_or(Commands::Update) {
        Commands::LastUpdate => {}
        Commands::Generate => {
            let service = fred_service(&settings, store.clone())?;
            let rows = service
                .generate_zero_curves()
                .context("generating zero curves")?;
            println!("{} {} rows", "Generated".green().bold(), rows);
        }
        Commands::Update => {
            let service = fred_service(&settings, store.clone())?;
            let outcome = service.update_rates().context("updating zero curves")?;
            if outcome.added() > 0 {
                println!("{}", outcome.to_string().green());
            } else {
                println!("{}", outcome.to_string().yellow());
            }
        }
    }

    print_last_update(&store)
}

/// FRED-backed service; exits when the API key is missing
fn fred_service(
    settings: &Settings,
    store: CurveStore,
) -> anyhow::Result<ZeroCurveService<FredClient>> {
    let source = match SourceConfig::from_env() {
        Ok(source) => settings.apply_to(source),
        Err(_) => {
            eprintln!("{} FRED_API_KEY not set", "Error:".red().bold());
            process::exit(1);
        }
    };
    let client = FredClient::new(source).context("creating FRED client")?;
    Ok(ZeroCurveService::new(client, store).with_epoch(settings.epoch))
}

fn print_last_update(store: &CurveStore) -> anyhow::Result<()> {
    let last = store
        .last_update_date()
        .with_context(|| format!("reading {}", store.path().display()))?;
    match last {
        Some(date) => println!("Last update: {}", date),
        None => println!("Last update: None"),
    }
    Ok(())
}
