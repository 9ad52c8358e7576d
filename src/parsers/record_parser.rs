use crate::data_models::{Container, Measurements, Range, Reading, Sensors, Sewage};
use crate::errors::ParseError;
use crate::utils::parse_locale_float;
use chrono::NaiveDateTime;

/// chrono equivalent of the exporter's `HH:mm:ss.fff dd-MM-yyyy`.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f %d-%m-%Y";
/// Exact layout of a timestamp; `0` stands for any ASCII digit.
const TIMESTAMP_SHAPE: &[u8] = b"00:00:00.000 00-00-0000";
pub const FIELD_DELIMITER: char = ';';
/// Timestamp, message and 18 numeric columns.
pub const FIELD_COUNT: usize = 20;

// Column positions in the export. Only this module addresses fields by index.
mod col {
    pub const TIMESTAMP: usize = 0;
    pub const MESSAGE: usize = 1;
    pub const L301: usize = 2;
    pub const CONTAINER_FLOW: usize = 3;
    pub const MBW_FLOW: usize = 4;
    pub const MBW_TEMPERATURE: usize = 5;
    pub const MBW_CONDUCTIVITY: usize = 6;
    pub const MBW_PH: usize = 7;
    pub const T101: usize = 8;
    pub const F206: usize = 9;
    pub const F103: usize = 10;
    pub const L203: usize = 11;
    pub const Q220: usize = 12;
    pub const Q221: usize = 13;
    pub const CONTAINER_DRAIN: usize = 14;
    pub const SEWAGE_DISCHARGE: usize = 15;
    pub const SEWAGE_TEMPERATURE_MAX: usize = 16;
    pub const SEWAGE_TEMPERATURE_MIN: usize = 17;
    pub const SEWAGE_PH_MAX: usize = 18;
    pub const SEWAGE_PH_MIN: usize = 19;
}

/// Parse one export line into a `Reading`.
///
/// Returns `Ok(None)` for a line without any delimiter. The exporter emits
/// such lines occasionally and they carry no measurement, so callers skip
/// them instead of aborting. Every other line must have exactly
/// `FIELD_COUNT` fields with a valid timestamp and numeric columns.
pub fn parse_record(line: &str) -> Result<Option<Reading>, ParseError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    match fields.len() {
        1 => return Ok(None),
        FIELD_COUNT => {}
        found => {
            return Err(ParseError::FieldCount {
                expected: FIELD_COUNT,
                found,
            })
        }
    }

    let number = |index: usize, field: &'static str| -> Result<f64, ParseError> {
        let raw = fields[index];
        parse_locale_float(raw).map_err(|source| ParseError::Number {
            field,
            value: raw.to_string(),
            source,
        })
    };

    let timestamp = parse_timestamp(fields[col::TIMESTAMP])?;

    let sensors = Sensors {
        level_l301: number(col::L301, "level_l301")?,
        temperature_t101: number(col::T101, "temperature_t101")?,
        flow_f206: number(col::F206, "flow_f206")?,
        flow_f103: number(col::F103, "flow_f103")?,
        level_l203: number(col::L203, "level_l203")?,
        flow_rate_q220: number(col::Q220, "flow_rate_q220")?,
        flow_rate_q221: number(col::Q221, "flow_rate_q221")?,
    };

    let container = Container {
        flow: number(col::CONTAINER_FLOW, "container.flow")?,
        drain: number(col::CONTAINER_DRAIN, "container.drain")?,
    };

    let measurement = Measurements {
        flow: number(col::MBW_FLOW, "measurement.flow")?,
        temperature: number(col::MBW_TEMPERATURE, "measurement.temperature")?,
        conductivity: number(col::MBW_CONDUCTIVITY, "measurement.conductivity")?,
        ph: number(col::MBW_PH, "measurement.ph")?,
    };

    let sewage = Sewage {
        discharge: number(col::SEWAGE_DISCHARGE, "sewage.discharge")?,
        temperature: Range {
            minimum: number(col::SEWAGE_TEMPERATURE_MIN, "sewage.temperature.minimum")?,
            maximum: number(col::SEWAGE_TEMPERATURE_MAX, "sewage.temperature.maximum")?,
        },
        ph: Range {
            minimum: number(col::SEWAGE_PH_MIN, "sewage.ph.minimum")?,
            maximum: number(col::SEWAGE_PH_MAX, "sewage.ph.maximum")?,
        },
    };

    Ok(Some(Reading {
        timestamp,
        message: fields[col::MESSAGE].to_string(),
        sensors,
        container,
        measurement,
        sewage,
    }))
}

// chrono treats `%.3f` as optional and accepts unpadded fields, so the
// layout is checked byte by byte first.
fn has_timestamp_shape(value: &str) -> bool {
    value.len() == TIMESTAMP_SHAPE.len()
        && value
            .bytes()
            .zip(TIMESTAMP_SHAPE)
            .all(|(byte, &expected)| match expected {
                b'0' => byte.is_ascii_digit(),
                _ => byte == expected,
            })
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    let timestamp_error = |message: String| ParseError::Timestamp {
        value: value.to_string(),
        format: TIMESTAMP_FORMAT.to_string(),
        message,
    };
    if !has_timestamp_shape(value) {
        return Err(timestamp_error(
            "expected layout HH:MM:SS.fff DD-MM-YYYY".to_string(),
        ));
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| timestamp_error(e.to_string()))
}
