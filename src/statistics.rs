//! Per-day aggregates over a `DailyBucket`.
//!
//! Every aggregate returns [`EMPTY_SENTINEL`] (NaN) when there is nothing to
//! aggregate, so report cells can render "no data" without branching.

use crate::data_models::{DailyBucket, Reading};
use chrono::NaiveTime;

/// Result of any aggregate over zero readings.
pub const EMPTY_SENTINEL: f64 = f64::NAN;

pub const HOURS_PER_DAY: f64 = 24.0;

pub fn is_empty_sentinel(value: f64) -> bool {
    value.is_nan()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        EMPTY_SENTINEL
    } else {
        sum / count as f64
    }
}

fn min(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::min).unwrap_or(EMPTY_SENTINEL)
}

fn max(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::max).unwrap_or(EMPTY_SENTINEL)
}

impl DailyBucket {
    fn values<'a>(&'a self, field: impl Fn(&Reading) -> f64 + 'a) -> impl Iterator<Item = f64> + 'a {
        self.readings().iter().map(field)
    }

    /// Mean flow at the measuring station.
    pub fn mean_outflow(&self) -> f64 {
        mean(self.values(|r| r.measurement.flow))
    }

    /// Mean hourly flow scaled to a full day.
    pub fn daily_outflow(&self) -> f64 {
        self.mean_outflow() * HOURS_PER_DAY
    }

    pub fn mean_container_outflow(&self) -> f64 {
        mean(self.values(|r| r.container.drain))
    }

    pub fn daily_container_outflow(&self) -> f64 {
        self.mean_container_outflow() * HOURS_PER_DAY
    }

    pub fn ph_min(&self) -> f64 {
        min(self.values(|r| r.measurement.ph))
    }

    pub fn ph_max(&self) -> f64 {
        max(self.values(|r| r.measurement.ph))
    }

    pub fn ph_mean(&self) -> f64 {
        mean(self.values(|r| r.measurement.ph))
    }

    pub fn temperature_min(&self) -> f64 {
        min(self.values(|r| r.measurement.temperature))
    }

    pub fn temperature_max(&self) -> f64 {
        max(self.values(|r| r.measurement.temperature))
    }

    pub fn temperature_mean(&self) -> f64 {
        mean(self.values(|r| r.measurement.temperature))
    }

    /// Temperature percentile over the readings whose time of day lies in
    /// `[start, end]` (both inclusive).
    ///
    /// The sorted values are indexed at `floor(percentile * count)`. That
    /// index is clamped to the last element, so `percentile == 1.0` yields
    /// the maximum; negative or NaN percentiles yield the minimum.
    pub fn temperature_percentile(&self, start: NaiveTime, end: NaiveTime, percentile: f64) -> f64 {
        let mut temperatures: Vec<f64> = self
            .readings()
            .iter()
            .filter(|r| {
                let time = r.timestamp.time();
                time >= start && time <= end
            })
            .map(|r| r.measurement.temperature)
            .collect();

        if temperatures.is_empty() {
            return EMPTY_SENTINEL;
        }

        temperatures.sort_by(|a, b| a.total_cmp(b));
        let count = temperatures.len();
        // Float to usize casts saturate: negatives and NaN become 0.
        let index = ((percentile * count as f64).floor() as usize).min(count - 1);
        temperatures[index]
    }
}
