//! CLI entry point for the fleet ETL tool.
//!
//! Provides subcommands for running one ingestion cycle against the MBTA
//! vehicles feed and for querying the stored fleet snapshot.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fleet_etl::config::Config;
use fleet_etl::infra::mbta::MbtaClient;
use fleet_etl::output::{
    append_records, print_bearings, print_json, print_routes, print_stats, print_vehicles,
};
use fleet_etl::pipeline::Pipeline;
use fleet_etl::store::VehicleStore;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_etl")]
#[command(about = "Load MBTA vehicle positions into SQLite and query fleet statistics", long_about = None)]
struct Cli {
    /// SQLite database path (overrides MBTA_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Vehicles API URL (overrides MBTA_API_URL)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ETL pipeline once
    Run,
    /// Show the 10 fastest vehicles
    Top {
        /// Optional: CSV file to append the results to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Vehicle counts and speeds per route type
    Routes,
    /// Fleet summary statistics
    Stats {
        /// Print as JSON instead of one metric per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Vehicle counts per compass sector
    Bearings,
    /// Vehicles heading within DELTA degrees of TARGET (no 0°/360° wraparound)
    Heading {
        /// Target bearing in degrees
        target: i64,

        /// Tolerance either side of the target
        #[arg(short, long, default_value_t = 22)]
        delta: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fleet_etl.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_etl.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(api) = cli.api {
        config.api_url = api;
    }

    let store = VehicleStore::open(&config.db_path)?;
    let api = MbtaClient::from_config(&config)?;
    let api_url = api.api_url().to_string();
    let mut pipeline = Pipeline::new(api, store);

    match cli.command {
        Commands::Run => {
            info!(api_url = %api_url, db = %config.db_path, "Starting ETL cycle");
            let records = pipeline.run_once().await?;
            info!(records, "ETL pipeline completed successfully");
        }
        Commands::Top { csv } => {
            let vehicles = pipeline.top_fastest()?;
            print_vehicles("Top 10 Fastest Vehicles", &vehicles);
            if let Some(path) = csv {
                append_records(&path, &vehicles)?;
                info!(path = %path, rows = vehicles.len(), "Results appended to CSV");
            }
        }
        Commands::Routes => {
            let routes = pipeline.route_breakdown()?;
            print_routes(&routes);
        }
        Commands::Stats { json } => {
            let stats = pipeline.summary_stats()?;
            if json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Commands::Bearings => {
            let counts = pipeline.bearing_summary()?;
            print_bearings(&counts);
        }
        Commands::Heading { target, delta } => {
            let vehicles = pipeline.bearing_filter(target, delta)?;
            print_vehicles(
                &format!("Vehicles heading {target}° ± {delta}°"),
                &vehicles,
            );
        }
    }

    pipeline.close()?;
    Ok(())
}
