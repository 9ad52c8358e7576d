use crate::errors::ConfigError;
use chrono::NaiveTime;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Inclusive time-of-day window for the temperature percentile columns.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn from_hms(start: (u32, u32, u32), end: (u32, u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, start.2)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, end.2)?,
        })
    }

    /// Column label fragment, e.g. `00:00h-05:59h`.
    pub fn label(&self) -> String {
        format!("{}h-{}h", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// The four six-hour reporting windows. Consecutive windows leave a one
/// second gap (`05:59:59` / `06:00:00`), matching the published reports.
pub fn default_windows() -> Vec<TimeWindow> {
    [(0, 5), (6, 11), (12, 17), (18, 23)]
        .into_iter()
        .filter_map(|(start_hour, end_hour)| TimeWindow::from_hms((start_hour, 0, 0), (end_hour, 59, 59)))
        .collect()
}

fn default_percentile() -> f64 {
    0.80
}

fn default_min_sample_size() -> usize {
    10
}

fn default_true() -> bool {
    true
}

/// Parameters of a report run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_percentile")]
    pub percentile: f64,
    #[serde(default = "default_windows")]
    pub windows: Vec<TimeWindow>,
    /// Days with fewer readings are left out of the summary and detail output.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: usize,
    #[serde(default = "default_true")]
    pub csv_output: bool,
    #[serde(default = "default_true")]
    pub daily_reports: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            percentile: default_percentile(),
            windows: default_windows(),
            min_sample_size: default_min_sample_size(),
            csv_output: true,
            daily_reports: true,
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(ConfigError::Invalid {
                field: "percentile".to_string(),
                message: format!("{} is outside [0, 1]", self.percentile),
            });
        }
        if self.windows.is_empty() {
            return Err(ConfigError::Invalid {
                field: "windows".to_string(),
                message: "at least one window is required".to_string(),
            });
        }
        if let Some(window) = self.windows.iter().find(|w| w.start > w.end) {
            return Err(ConfigError::Invalid {
                field: "windows".to_string(),
                message: format!("window {} starts after it ends", window.label()),
            });
        }
        Ok(())
    }
}

/// Load and validate a report configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let config: ReportConfig =
        serde_json::from_reader(reader).map_err(|e| ConfigError::JsonParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.validate()?;

    info!("Loaded report configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_windows_cover_the_day() {
        let windows = default_windows();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].start, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(windows[0].end, NaiveTime::from_hms_opt(5, 59, 59).unwrap());
        assert_eq!(windows[1].start, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(windows[3].end, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        assert_eq!(windows[2].label(), "12:00h-17:59h");
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ReportConfig::default();
        assert_eq!(config.percentile, 0.80);
        assert_eq!(config.min_sample_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ReportConfig::default();
        config.percentile = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = ReportConfig::default();
        config.windows = vec![TimeWindow::from_hms((12, 0, 0), (6, 0, 0)).unwrap()];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = ReportConfig::default();
        config.windows.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"percentile": 0.5, "windows": [{{"start": "08:00:00", "end": "16:00:00"}}], "daily_reports": false}}"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.percentile, 0.5);
        assert_eq!(config.windows.len(), 1);
        assert_eq!(config.windows[0].label(), "08:00h-16:00h");
        assert_eq!(config.min_sample_size, 10);
        assert!(config.csv_output);
        assert!(!config.daily_reports);
    }

    #[test]
    fn test_load_config_errors() {
        let missing = load_config(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(ConfigError::NotFound { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::JsonParseError { .. })
        ));
    }
}
