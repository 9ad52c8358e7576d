//! Report rows and the CSV artifacts built from them.

use crate::config::ReportConfig;
use crate::data_models::DailyBucket;
use crate::errors::PipelineError;
use crate::metrics::METRICS;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::WriterBuilder;
use log::{info, warn};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CSV_DELIMITER: u8 = b';';
pub const CSV_EXTENSION: &str = "csv";
pub const REPORT_FILE_PREFIX: &str = "rvt-report-";

const DETAIL_HEADERS: [&str; 5] = [
    "Datum und Uhrzeit",
    "Durchfluss Pufferbehälter",
    "Durchfluss Mbw.",
    "Temperatur Mbw.",
    "Ph-Wert Mbw.",
];
const DETAIL_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One line of the summary report, derived from a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub container_outflow_per_day: f64,
    pub outflow_per_day: f64,
    pub ph_max: f64,
    pub ph_min: f64,
    pub temperature_mean: f64,
    pub temperature_max: f64,
    /// One value per configured window, in window order.
    pub temperature_percentiles: Vec<f64>,
}

impl ReportRow {
    pub fn from_bucket(bucket: &DailyBucket, config: &ReportConfig) -> Self {
        Self {
            date: bucket.date(),
            container_outflow_per_day: bucket.daily_container_outflow(),
            outflow_per_day: bucket.daily_outflow(),
            ph_max: bucket.ph_max(),
            ph_min: bucket.ph_min(),
            temperature_mean: bucket.temperature_mean(),
            temperature_max: bucket.temperature_max(),
            temperature_percentiles: config
                .windows
                .iter()
                .map(|w| bucket.temperature_percentile(w.start, w.end, config.percentile))
                .collect(),
        }
    }

    fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.date.month().to_string(),
            self.date.day().to_string(),
            self.container_outflow_per_day.to_string(),
            self.outflow_per_day.to_string(),
            self.ph_max.to_string(),
            self.ph_min.to_string(),
            self.temperature_mean.to_string(),
            self.temperature_max.to_string(),
        ];
        record.extend(self.temperature_percentiles.iter().map(f64::to_string));
        record
    }
}

/// Minimum-sample-size gate for detailed per-day output.
pub fn passes_sample_gate(bucket: &DailyBucket, min_sample_size: usize) -> bool {
    bucket.reading_count() >= min_sample_size
}

pub fn summary_headers(config: &ReportConfig) -> Vec<String> {
    let mut headers: Vec<String> = [
        "Monat",
        "Tag",
        "Auslaufmenge Pufferbehälter",
        "Einleitmenge",
        "Tagesmaximum pH-Wert",
        "Tagesminimum pH-Wert",
        "Tagesmittelwert Temperatur",
        "Tagesmaximalwert Temperatur",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    headers.extend(
        config
            .windows
            .iter()
            .map(|w| format!("Temperatur Perzentil {} - {}", config.percentile, w.label())),
    );
    headers
}

pub fn summary_units(config: &ReportConfig) -> Vec<String> {
    let mut units: Vec<String> = ["", "", "m³/d", "m³/d", "", "", "°C", "°C"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    units.extend(config.windows.iter().map(|_| "°C".to_string()));
    units
}

/// Days that pass the sample gate, in bucket order. Excluded days are
/// logged and counted.
pub fn reportable_days<'a>(buckets: &'a [DailyBucket], config: &ReportConfig) -> Vec<&'a DailyBucket> {
    let (days, gated): (Vec<&DailyBucket>, Vec<&DailyBucket>) = buckets
        .iter()
        .partition(|b| passes_sample_gate(b, config.min_sample_size));

    for bucket in &gated {
        warn!(
            "Skipping {} in report: {} readings, minimum is {}",
            bucket.date(),
            bucket.reading_count(),
            config.min_sample_size
        );
    }
    METRICS
        .lock()
        .record_buckets(buckets.len() as u64, gated.len() as u64);
    days
}

pub fn summary_rows(days: &[&DailyBucket], config: &ReportConfig) -> Vec<ReportRow> {
    days.par_iter()
        .map(|b| ReportRow::from_bucket(b, config))
        .collect()
}

pub fn write_summary<W: io::Write>(
    writer: W,
    rows: &[ReportRow],
    config: &ReportConfig,
) -> Result<(), csv::Error> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(writer);
    csv_writer.write_record(summary_headers(config))?;
    csv_writer.write_record(summary_units(config))?;
    for row in rows {
        csv_writer.write_record(row.to_record())?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_daily_detail<W: io::Write>(writer: W, bucket: &DailyBucket) -> Result<(), csv::Error> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(writer);
    csv_writer.write_record(DETAIL_HEADERS)?;
    for reading in bucket.readings() {
        csv_writer.write_record([
            reading.timestamp.format(DETAIL_TIMESTAMP_FORMAT).to_string(),
            reading.container.flow.to_string(),
            reading.measurement.flow.to_string(),
            reading.measurement.temperature.to_string(),
            reading.measurement.ph.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn create_file(path: &Path) -> Result<fs::File, PipelineError> {
    fs::File::create(path).map_err(|e| PipelineError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> PipelineError + '_ {
    move |source| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Write all enabled artifacts into `output_dir` and return their paths.
///
/// Artifacts are named after `generated_at`: the summary as
/// `rvt-report-<yyyy-MM-dd_HH-mm-ss>.csv`, each day as
/// `rvt-report-<stamp>-<dd-MM>.csv`. When any artifact fails, the ones
/// already written are removed again.
pub fn write_report(
    buckets: &[DailyBucket],
    config: &ReportConfig,
    output_dir: &Path,
    generated_at: NaiveDateTime,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut written = Vec::new();
    if !config.csv_output && !config.daily_reports {
        warn!("All report outputs are disabled, nothing to write");
        return Ok(written);
    }

    fs::create_dir_all(output_dir).map_err(|e| PipelineError::Io {
        path: output_dir.to_path_buf(),
        source: e,
    })?;
    let stem = format!(
        "{}{}",
        REPORT_FILE_PREFIX,
        generated_at.format("%Y-%m-%d_%H-%M-%S")
    );
    let days = reportable_days(buckets, config);

    if let Err(e) = write_artifacts(&days, config, output_dir, &stem, &mut written) {
        remove_artifacts(&written);
        return Err(e);
    }

    METRICS.lock().record_artifacts(written.len() as u64);
    Ok(written)
}

fn write_artifacts(
    days: &[&DailyBucket],
    config: &ReportConfig,
    output_dir: &Path,
    stem: &str,
    written: &mut Vec<PathBuf>,
) -> Result<(), PipelineError> {
    if config.csv_output {
        let rows = summary_rows(days, config);
        let path = output_dir.join(format!("{}.{}", stem, CSV_EXTENSION));
        let file = create_file(&path)?;
        // Pushed before writing so a half-written file is cleaned up too.
        written.push(path.clone());
        write_summary(file, &rows, config).map_err(csv_error(&path))?;
        info!("Wrote summary with {} days to {}", rows.len(), path.display());
    }

    if config.daily_reports {
        for bucket in days {
            let path = output_dir.join(format!(
                "{}-{}.{}",
                stem,
                bucket.date().format("%d-%m"),
                CSV_EXTENSION
            ));
            let file = create_file(&path)?;
            written.push(path.clone());
            write_daily_detail(file, bucket).map_err(csv_error(&path))?;
        }
        info!("Wrote {} daily detail reports to {}", days.len(), output_dir.display());
    }
    Ok(())
}

fn remove_artifacts(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove partial artifact {}: {}", path.display(), e);
        }
    }
}
