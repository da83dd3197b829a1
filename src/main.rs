//! CLI entry point for the bike rental dashboard.
//!
//! Loads the hourly usage CSV once, then renders or exports the summary
//! tables for a chosen date range and user segment.

use anyhow::{Context, Result, anyhow};
use bikeshare_dash::config::Settings;
use bikeshare_dash::output::{export_csv, render_json, render_pretty};
use bikeshare_dash::{Dataset, DateRange, Report, Segment};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_dash")]
#[command(about = "Usage dashboard for an hourly bike rental dataset", long_about = None)]
struct Cli {
    /// Hourly usage CSV (overrides BIKESHARE_DATA_PATH)
    #[arg(short, long, global = true, value_name = "FILE")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first and last date in the dataset
    Bounds,
    /// Render the dashboard for a date range and user segment
    Report {
        #[command(flatten)]
        selection: Selection,

        /// Which user counts drive the charts and headline metric
        #[arg(short, long, default_value_t = Segment::All)]
        segment: Segment,

        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Write the six summary tables as CSV files
    Export {
        #[command(flatten)]
        selection: Selection,

        /// Directory to write `<table>.csv` files into
        #[arg(short, long, default_value = "summaries")]
        out_dir: PathBuf,
    },
}

/// Inclusive date range; either end defaults to the dataset bounds.
#[derive(Args)]
struct Selection {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_dash.log"));

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

    let data_path = cli.data.unwrap_or(settings.data_path);
    let dataset = Dataset::load(&data_path)
        .with_context(|| format!("failed to load {}", data_path.display()))?;

    match cli.command {
        Commands::Bounds => {
            let (first, last) = dataset
                .date_bounds()
                .ok_or_else(|| anyhow!("dataset {} has no records", data_path.display()))?;
            println!("{first} {last} ({} records)", dataset.len());
        }
        Commands::Report {
            selection,
            segment,
            format,
        } => {
            let range = DateRange::resolve(&dataset, selection.start, selection.end)?;
            let report = Report::build(&dataset, range, segment);
            let rendered = match format {
                Format::Pretty => render_pretty(&report),
                Format::Json => render_json(&report)?,
            };
            println!("{rendered}");
        }
        Commands::Export { selection, out_dir } => {
            let range = DateRange::resolve(&dataset, selection.start, selection.end)?;
            let report = Report::build(&dataset, range, Segment::All);
            let written = export_csv(&out_dir, &report.summaries)?;
            for path in written {
                info!(path = %path.display(), "Wrote table");
            }
        }
    }

    Ok(())
}
