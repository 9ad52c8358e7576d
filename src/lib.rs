pub mod aggregator;
pub mod config;
pub mod data_models;
pub mod errors;
pub mod file_processor;
pub mod metrics;
pub mod parsers;
pub mod report;
pub mod statistics;
pub mod utils;

pub use aggregator::group_by_day;
pub use config::{ReportConfig, TimeWindow};
pub use data_models::{DailyBucket, Reading};
pub use errors::{ConfigError, ParseError, PipelineError};
pub use statistics::{is_empty_sentinel, EMPTY_SENTINEL};

#[cfg(test)]
mod tests;
