//! CLI entry point for the covid_trends report tool.
//!
//! Provides subcommands for running a single report, running the whole
//! catalog concurrently, listing the catalog, and fetching dataset
//! snapshots.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use covid_trends::dataset::{CovidDataset, CsvSource, DatasetSource};
use covid_trends::fetch::{BasicClient, save_snapshot};
use covid_trends::output::OutputFormat;
use covid_trends::reports::{self, ReportKind, ReportOptions};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "covid_trends")]
#[command(about = "Rolling-window and ranking reports over COVID-19 case and vaccination tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one catalog report and write it to a file
    Report {
        /// Report name, as listed by list-reports
        #[arg(value_name = "NAME")]
        name: String,

        /// Cases table (.csv or .csv.gz); defaults to COVID_CASES_PATH
        #[arg(long)]
        cases: Option<String>,

        /// Vaccinations table; defaults to COVID_VACCINATIONS_PATH
        #[arg(long)]
        vaccinations: Option<String>,

        /// Output file; defaults to <NAME>.<format>
        #[arg(short, long)]
        output: Option<String>,

        /// Output format: csv or json
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Trailing window length in days for windowed reports
        #[arg(short, long, default_value_t = 7)]
        window: usize,

        /// Row cap for previews and rankings
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Case-insensitive location substring filter
        #[arg(long)]
        location: Option<String>,
    },
    /// Run every catalog report into a directory
    RunAll {
        /// Cases table (.csv or .csv.gz); defaults to COVID_CASES_PATH
        #[arg(long)]
        cases: Option<String>,

        /// Vaccinations table; defaults to COVID_VACCINATIONS_PATH
        #[arg(long)]
        vaccinations: Option<String>,

        /// Directory for the report files and index.json
        #[arg(short, long, default_value = "reports")]
        output_dir: String,

        /// Output format: csv or json
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Trailing window length in days for windowed reports
        #[arg(short, long, default_value_t = 7)]
        window: usize,

        /// Row cap for previews and rankings
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Maximum number of reports computed concurrently
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,
    },
    /// List the report catalog
    ListReports,
    /// Download or copy a dataset snapshot to a local file
    Fetch {
        /// URL or local path of the snapshot
        #[arg(value_name = "URL_OR_PATH")]
        source: String,

        /// Destination file
        #[arg(short, long)]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_trends.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_trends.log"));

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
        Commands::Report {
            name,
            cases,
            vaccinations,
            output,
            format,
            window,
            limit,
            location,
        } => {
            let Some(kind) = ReportKind::from_name(&name) else {
                bail!("unknown report '{name}'; run list-reports for the catalog");
            };

            let dataset = load_dataset(cases, vaccinations)?;
            let opts = ReportOptions {
                window,
                limit,
                location,
            };
            let path = output.map(PathBuf::from).unwrap_or_else(|| {
                PathBuf::from(format!("{}.{}", kind.name(), format.extension()))
            });

            reports::run_report(kind, &dataset, &opts, &path, format)?;
        }
        Commands::RunAll {
            cases,
            vaccinations,
            output_dir,
            format,
            window,
            limit,
            concurrency,
        } => {
            run_all(
                cases,
                vaccinations,
                &output_dir,
                format,
                window,
                limit,
                concurrency,
            )
            .await?;
        }
        Commands::ListReports => {
            for kind in reports::ALL {
                info!(report = kind.name(), "{}", kind.description());
            }
            info!(total = reports::ALL.len(), "Report catalog");
        }
        Commands::Fetch { source, output } => {
            let client = BasicClient::new()?;
            save_snapshot(&client, &source, Path::new(&output)).await?;
        }
    }

    Ok(())
}

/// Resolves the two table paths from flags or environment, then loads
/// both tables.
fn load_dataset(cases: Option<String>, vaccinations: Option<String>) -> Result<CovidDataset> {
    let cases_path = resolve_table_path(cases, "COVID_CASES_PATH", "--cases")?;
    let vaccinations_path =
        resolve_table_path(vaccinations, "COVID_VACCINATIONS_PATH", "--vaccinations")?;

    let dataset = CsvSource::new(&cases_path, &vaccinations_path)
        .load()
        .context("loading dataset")?;

    info!(
        cases = dataset.cases.len(),
        vaccinations = dataset.vaccinations.len(),
        "Dataset loaded"
    );
    Ok(dataset)
}

fn resolve_table_path(
    flag: Option<String>,
    env_key: &str,
    flag_name: &str,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    match std::env::var(env_key) {
        Ok(path) => Ok(PathBuf::from(path)),
        Err(_) => bail!("no table path given: pass {flag_name} or set {env_key}"),
    }
}

/// One report's outcome inside a catalog run.
#[derive(Serialize)]
struct RunIndexEntry {
    name: String,
    rows: usize,
    path: String,
}

/// Batch summary written next to the report files as `index.json`.
#[derive(Serialize)]
struct RunIndex {
    generated_at: DateTime<Utc>,
    reports: Vec<RunIndexEntry>,
}

/// Runs the whole catalog against one loaded dataset with bounded
/// concurrency, then writes the batch index. A single failing report is
/// logged and the rest still run; the command exits nonzero if any
/// failed.
#[tracing::instrument(skip(cases, vaccinations, format), fields(output_dir, concurrency))]
async fn run_all(
    cases: Option<String>,
    vaccinations: Option<String>,
    output_dir: &str,
    format: OutputFormat,
    window: usize,
    limit: usize,
    concurrency: usize,
) -> Result<()> {
    let dataset = Arc::new(load_dataset(cases, vaccinations)?);
    let opts = ReportOptions {
        window,
        limit,
        location: None,
    };

    std::fs::create_dir_all(output_dir)?;

    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency));
    let mut tasks = vec![];

    for kind in reports::ALL {
        let sem = semaphore.clone();
        let dataset = dataset.clone();
        let opts = opts.clone();
        let path = Path::new(output_dir).join(format!("{}.{}", kind.name(), format.extension()));

        let report_span = tracing::info_span!("run_report", report = kind.name());

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire().await?;
                let rows = reports::run_report(kind, &dataset, &opts, &path, format)?;
                Ok::<_, anyhow::Error>(RunIndexEntry {
                    name: kind.name().to_string(),
                    rows,
                    path: path.display().to_string(),
                })
            }
            .instrument(report_span),
        );

        tasks.push((kind, task));
    }

    let mut entries = Vec::new();
    let mut failed = 0usize;

    for (kind, task) in tasks {
        match task.await {
            Ok(Ok(entry)) => entries.push(entry),
            Ok(Err(e)) => {
                failed += 1;
                error!(report = kind.name(), error = %e, "Report failed");
            }
            Err(e) => {
                failed += 1;
                error!(report = kind.name(), error = %e, "Report task panicked");
            }
        }
    }

    let index = RunIndex {
        generated_at: Utc::now(),
        reports: entries,
    };
    let index_path = Path::new(output_dir).join("index.json");
    let file = std::fs::File::create(&index_path)?;
    serde_json::to_writer_pretty(file, &index)?;

    info!(
        written = index.reports.len(),
        failed,
        index = %index_path.display(),
        "Catalog run complete"
    );

    if failed > 0 {
        bail!("{failed} report(s) failed");
    }
    Ok(())
}
