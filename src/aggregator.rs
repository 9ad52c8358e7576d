use crate::data_models::{DailyBucket, Reading};
use chrono::NaiveDate;
use log::info;
use std::collections::HashMap;

/// Partition readings into one bucket per calendar day.
///
/// Buckets appear in the order their date is first seen; the input is not
/// sorted. Within a bucket, readings keep their input order and duplicate
/// timestamps are kept.
pub fn group_by_day<I>(readings: I) -> Vec<DailyBucket>
where
    I: IntoIterator<Item = Reading>,
{
    let mut buckets: Vec<DailyBucket> = Vec::new();
    let mut index_by_date: HashMap<NaiveDate, usize> = HashMap::new();

    for reading in readings {
        let date = reading.date();
        let slot = *index_by_date.entry(date).or_insert_with(|| {
            buckets.push(DailyBucket::new(date));
            buckets.len() - 1
        });
        buckets[slot].push(reading);
    }

    info!("Grouped readings into {} daily buckets", buckets.len());
    buckets
}
