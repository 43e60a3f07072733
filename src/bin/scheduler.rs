//! Schedule-builder CLI entry point.
//!
//! Reads spots and preferences from the command line, runs the engine
//! against the configured catalog, and prints either the JSON report or
//! a readable listing on stdout. Logs go to stderr so the report stream
//! stays clean.
//!
//! # Usage
//!
//! ```bash
//! usc-scheduler \
//!   --class-spots "CSCI 103,CSCI 104|WRIT 150|BISC 120,MATH 126" \
//!   --preferences "morning|Fri|shorter|0|1|1" \
//!   --json
//! ```
//!
//! # Environment Variables
//!
//! - `USC_DB_NAME`, `USC_DB_USER`, `USC_DB_PASSWORD`, `USC_DB_HOST`,
//!   `USC_DB_PORT`: catalog connection parameters
//! - `RUST_LOG`: log level (default: info)

use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use usc_scheduler::cli::Cli;
use usc_scheduler::db::{PgCatalog, PgCatalogProvider};
use usc_scheduler::output::{self, ErrorReport};
use usc_scheduler::services::{Scheduler, DEFAULT_TOP_N};

fn main() -> ExitCode {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("fatal: {err:#}");
            if cli.json {
                let report = ErrorReport {
                    error: format!("{err:#}"),
                };
                println!("{}", serde_json::json!(report));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let spots = cli.spots();
    let prefs = cli.preferences();
    let config = cli.db_config();

    info!(
        spots = spots.len(),
        semester = %config.semester,
        "building schedules"
    );

    let provider = PgCatalogProvider::new(config.clone());
    let scheduler = Scheduler::new(provider);
    let results = scheduler.build(&spots, &prefs, DEFAULT_TOP_N)?;

    // A separate connection renders the report's rating details.
    let mut catalog = PgCatalog::connect(&config)?;
    let report = output::build_report(&mut catalog, &results, &prefs)?;

    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print!("{}", output::render_text(&report));
    }
    Ok(())
}
