use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse JSON configuration in {path}: {source}")]
    JsonParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration file not found at {path}")]
    NotFound { path: PathBuf },
    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// A single export line that could not be turned into a `Reading`.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Expected {expected} fields but found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("Timestamp '{value}' does not match format '{format}': {message}")]
    Timestamp {
        value: String,
        format: String,
        message: String,
    },
    #[error("Field '{field}' has non-numeric value '{value}': {source}")]
    Number {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    // Operator-facing messages stay in German, like the rest of the report.
    #[error("Es wurde keine Datei ausgewählt, die zur Erstellung des Reports verwendet wird. Bitte geben Sie zuerst einen Dateipfad der Export-Datei an.")]
    MissingInput,
    #[error("Die angegebene Datei {path} konnte nicht gefunden werden. Bitte gehen Sie sicher, dass die Datei existiert!")]
    InputNotFound { path: PathBuf },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Die Datei {path} ist weder UTF-16 noch UTF-8 kodiert")]
    Decode { path: PathBuf },
    #[error("Fehlerhafte Zeile {row} in der Export-Datei: {source}")]
    Parse {
        row: usize,
        #[source]
        source: ParseError,
    },
    #[error("Configuration parsing failed: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to write CSV report {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
