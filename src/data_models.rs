use chrono::{NaiveDate, NaiveDateTime};

/// Raw plant inputs, named after their instrument tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sensors {
    pub level_l301: f64,
    pub temperature_t101: f64,
    pub flow_f206: f64,
    pub flow_f103: f64,
    pub level_l203: f64,
    pub flow_rate_q220: f64,
    pub flow_rate_q221: f64,
}

/// Buffer tank values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    /// Throughput into the buffer tank.
    pub flow: f64,
    /// Outflow from the buffer tank.
    pub drain: f64,
}

/// The four primary monitored quantities at the measuring station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    pub flow: f64,
    pub temperature: f64,
    pub conductivity: f64,
    pub ph: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    pub minimum: f64,
    pub maximum: f64,
}

/// Values at the discharge point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sewage {
    pub discharge: f64,
    pub temperature: Range,
    pub ph: Range,
}

/// One fully parsed line of the plant export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub message: String,
    pub sensors: Sensors,
    pub container: Container,
    pub measurement: Measurements,
    pub sewage: Sewage,
}

impl Reading {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// All readings of one calendar day, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    date: NaiveDate,
    readings: Vec<Reading>,
}

impl DailyBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            readings: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Number of readings collected for this day. Used by the report layer
    /// for its minimum-sample-size gate.
    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    pub(crate) fn push(&mut self, reading: Reading) {
        debug_assert_eq!(reading.date(), self.date);
        self.readings.push(reading);
    }
}
