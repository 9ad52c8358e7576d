use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info};
use rvt_report::config::{load_config, ReportConfig};
use rvt_report::metrics::METRICS;
use rvt_report::{aggregator, file_processor, report, time_operation, PipelineError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Daily report from an RVT plant export", long_about = None)]
struct Cli {
    /// Export file written by the plant controller (.txt or .csv)
    #[clap(long, env = "RVT_INPUT")]
    input: Option<PathBuf>,
    #[clap(long, default_value = "reports")]
    output_dir: PathBuf,
    /// JSON report configuration; defaults are used when omitted
    #[clap(long)]
    config: Option<PathBuf>,
    #[clap(long)]
    percentile: Option<f64>,
    #[clap(long)]
    min_samples: Option<usize>,
    #[clap(long)]
    no_csv: bool,
    #[clap(long)]
    no_daily_reports: bool,
}

impl Cli {
    fn report_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => ReportConfig::default(),
        };
        if let Some(percentile) = self.percentile {
            config.percentile = percentile;
        }
        if let Some(min_samples) = self.min_samples {
            config.min_sample_size = min_samples;
        }
        config.csv_output &= !self.no_csv;
        config.daily_reports &= !self.no_daily_reports;
        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.report_config()?;
    let input = cli.input.clone().ok_or(PipelineError::MissingInput)?;

    let readings = time_operation!("parse", file_processor::read_export(&input))?;
    let buckets = time_operation!("aggregate", aggregator::group_by_day(readings));
    let written = time_operation!(
        "report",
        report::write_report(&buckets, &config, &cli.output_dir, Local::now().naive_local())
    )
    .with_context(|| format!("Failed to write report to {:?}", cli.output_dir))?;

    for path in &written {
        info!("Created {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = run(&cli);
    METRICS.lock().log_summary();

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
    info!("Report created successfully.");
}
