use crate::data_models::Reading;
use crate::errors::PipelineError;
use crate::metrics::METRICS;
use crate::parsers;
use crate::utils::decode_export;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Prefix of the column header line written by the plant exporter.
pub const HEADER_PREFIX: &str = "Datum und Uhrzeit;";
pub const LINE_TERMINATOR: &str = "\r\n";

/// Reads and parses a plant export file.
///
/// Fails before touching the file system when no path is given or the file
/// does not exist, so the parser never sees an unreadable source.
pub fn read_export(file_path: &Path) -> Result<Vec<Reading>, PipelineError> {
    if file_path.as_os_str().is_empty() {
        return Err(PipelineError::MissingInput);
    }
    if !file_path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: file_path.to_path_buf(),
        });
    }

    info!("Reading export file: {}", file_path.display());
    let bytes = fs::read(file_path).map_err(|e| PipelineError::Io {
        path: file_path.to_path_buf(),
        source: e,
    })?;
    METRICS.lock().record_bytes_processed(bytes.len() as u64);

    let text = decode_export(&bytes).ok_or_else(|| PipelineError::Decode {
        path: file_path.to_path_buf(),
    })?;

    let readings = parse_export_text(&text)?;
    info!(
        "Parsed {} readings from {}",
        readings.len(),
        file_path.display()
    );
    Ok(readings)
}

/// Splits decoded export text into lines and parses every data line.
///
/// Blank lines and the header line are skipped. The first malformed line
/// aborts the whole run; its 1-based line number is part of the error.
pub fn parse_export_text(text: &str) -> Result<Vec<Reading>, PipelineError> {
    let mut readings = Vec::new();
    let mut lines = 0u64;
    let mut placeholders = 0u64;

    for (index, line) in text.split(LINE_TERMINATOR).enumerate() {
        if line.is_empty() || line.starts_with(HEADER_PREFIX) {
            continue;
        }
        lines += 1;

        let row = index + 1;
        match parsers::parse_record(line) {
            Ok(Some(reading)) => readings.push(reading),
            Ok(None) => {
                debug!("Skipping line {} without delimiter: '{}'", row, line);
                placeholders += 1;
            }
            Err(source) => {
                METRICS.lock().record_lines(lines);
                return Err(PipelineError::Parse { row, source });
            }
        }
    }

    let mut metrics = METRICS.lock();
    metrics.record_lines(lines);
    metrics.record_readings(readings.len() as u64);
    metrics.record_placeholders(placeholders);
    Ok(readings)
}
