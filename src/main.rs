//! Page Analyzer main entry point
//!
//! This is the command-line interface for registering and checking sites.

use anyhow::Context;
use clap::{Parser, Subcommand};
use page_analyzer::config::load_config;
use page_analyzer::output::{render_address_list, render_check_history, render_check_outcome};
use page_analyzer::storage::StorageError;
use page_analyzer::{AnalyzerError, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page Analyzer: on-demand site checks
///
/// Registers web addresses and checks them on demand, recording the HTTP
/// status and the page's H1, title and meta description. The database is
/// taken from the DATABASE_URL environment variable (a `.env` file is read
/// if present).
#[derive(Parser, Debug)]
#[command(name = "page-analyzer")]
#[command(version = "1.0.0")]
#[command(about = "On-demand site checks", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register an address
    Add {
        /// URL to register; only its scheme and host are kept
        url: String,
    },
    /// Check a registered address now
    Check {
        /// Address id
        id: i64,
    },
    /// Show an address with its check history
    Show {
        /// Address id
        id: i64,
    },
    /// List addresses with their latest check
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!("Database: {:?}", config.database.location);

    let pipeline = Pipeline::from_config(&config).context("Failed to start")?;

    match cli.command {
        Command::Add { url } => handle_add(&pipeline, &url)?,
        Command::Check { id } => handle_check(&pipeline, id).await?,
        Command::Show { id } => handle_show(&pipeline, id)?,
        Command::List => handle_list(&pipeline)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_analyzer=info,warn"),
            1 => EnvFilter::new("page_analyzer=debug,info"),
            2 => EnvFilter::new("page_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_add(pipeline: &Pipeline, raw: &str) -> anyhow::Result<()> {
    match pipeline.register(raw) {
        Ok(registration) if registration.created => {
            println!(
                "✓ Page added: {} (id {})",
                registration.address.name, registration.address.id
            );
        }
        Ok(registration) => {
            println!(
                "Page already exists: {} (id {})",
                registration.address.name, registration.address.id
            );
        }
        Err(AnalyzerError::Validation(e)) => {
            // Rejected input is a user-facing message, not a failure
            println!("✗ {}", e);
        }
        Err(e) => return Err(e).context("Failed to register address"),
    }
    Ok(())
}

async fn handle_check(pipeline: &Pipeline, id: i64) -> anyhow::Result<()> {
    match pipeline.check(id).await {
        Ok((address, outcome)) => print!("{}", render_check_outcome(&address, &outcome)),
        Err(AnalyzerError::Storage(StorageError::AddressNotFound(id))) => {
            println!("✗ No address with id {}", id);
        }
        Err(e) => return Err(e).context("Failed to check address"),
    }
    Ok(())
}

fn handle_show(pipeline: &Pipeline, id: i64) -> anyhow::Result<()> {
    match pipeline.history(id).context("Failed to load address")? {
        Some((address, checks)) => print!("{}", render_check_history(&address, &checks)),
        None => println!("✗ No address with id {}", id),
    }
    Ok(())
}

fn handle_list(pipeline: &Pipeline) -> anyhow::Result<()> {
    let summaries = pipeline.summaries().context("Failed to list addresses")?;
    print!("{}", render_address_list(&summaries));
    Ok(())
}
