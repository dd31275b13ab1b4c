//! CLI entry point for the Kigali fares dashboard backend.
//!
//! Provides subcommands for computing dashboard summaries, listing the
//! district breakdown, and cleaning raw ride exports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use kigali_fares::{
    analyzers::analyzer::run_cleaning,
    config::AppConfig,
    dataset::Dataset,
    filter::{DashboardFilter, DistrictFilter, Timeframe},
    output::{print_json, print_pretty, write_json},
    stats::MetricsAggregator,
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "kigali_fares")]
#[command(about = "Ride fare analytics for the Kigali dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the dashboard summary
    Summary {
        /// Dataset JSON file (defaults to $KIGALI_FARES_DATASET, then the bundled sample)
        #[arg(short, long)]
        dataset: Option<String>,

        /// District selector ("all" or a district name)
        #[arg(long, default_value = "all")]
        district: DistrictFilter,

        /// Timeframe selector (1month, 3months, 6months, 1year)
        #[arg(short, long, default_value = "6months")]
        timeframe: Timeframe,

        /// Optional: write the summary as JSON to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Gzip compress the JSON export
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List revenue, rides and share for every district
    Districts {
        /// Dataset JSON file (defaults to $KIGALI_FARES_DATASET, then the bundled sample)
        #[arg(short, long)]
        dataset: Option<String>,
    },
    /// Clean a raw rides CSV and write summary tables
    Clean {
        /// Raw rides CSV export
        #[arg(value_name = "INPUT")]
        input: String,

        /// Directory for the cleaned and summary CSVs
        #[arg(short, long, default_value = "data/cleaned")]
        output_dir: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = AppConfig::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let (log_dir, log_file_name) = config.log_location();
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

    match cli.command {
        Commands::Summary {
            dataset,
            district,
            timeframe,
            output,
            gzip,
        } => {
            let dataset = config.with_dataset(dataset).load_dataset()?;
            warn_if_invalid(&dataset);

            let filter = DashboardFilter { district, timeframe };
            info!(
                district = %filter.district,
                timeframe = %filter.timeframe,
                months = filter.timeframe.months(),
                "Filters recorded; reference data is not narrowed by selection"
            );

            let summary = MetricsAggregator::new(&dataset).summary(filter)?;
            print_pretty(&summary);
            print_json(&summary)?;

            if let Some(path) = output {
                write_json(&path, &summary, gzip)?;
            }
        }
        Commands::Districts { dataset } => {
            let dataset = config.with_dataset(dataset).load_dataset()?;
            warn_if_invalid(&dataset);
            let aggregator = MetricsAggregator::new(&dataset);

            for row in aggregator.district_breakdown()? {
                info!(
                    district = %row.district,
                    rides = row.ride_count,
                    average_fare = row.average_fare,
                    revenue = row.revenue,
                    revenue_share_pct = row.revenue_share_pct,
                    revenue_share_of_total_pct = row.revenue_share_of_total_pct,
                    "District"
                );
            }

            info!(
                total_revenue = aggregator.total_district_revenue(),
                total_rides = aggregator.total_district_rides(),
                "District totals"
            );
        }
        Commands::Clean { input, output_dir } => {
            let report = run_cleaning(&input, &output_dir)?;

            info!(
                total = report.after_outliers,
                first_pickup = ?report.first_pickup,
                last_pickup = ?report.last_pickup,
                districts = report.districts,
                service_types = report.service_types,
                "Data cleaning summary"
            );
        }
    }

    Ok(())
}

/// Logs a warning when the dataset breaks one of its invariants.
fn warn_if_invalid(dataset: &Dataset) {
    if let Err(e) = dataset.validate() {
        warn!(error = %e, "Dataset failed validation");
    }
}
