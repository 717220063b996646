use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::evaluation::metrics::{Comparison, Summary};

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub timestamp: u64,
    pub label: String,
    pub avg_wait: f64,
    pub avg_queue: f64,
    pub total_co2: f64,
    pub max_queue: u64,
    pub throughput: u64,
}

impl SummaryRecord {
    pub fn new(label: &str, summary: &Summary) -> Self {
        Self {
            timestamp: current_timestamp(),
            label: label.to_string(),
            avg_wait: summary.avg_wait,
            avg_queue: summary.avg_queue,
            total_co2: summary.total_co2,
            max_queue: summary.max_queue,
            throughput: summary.throughput,
        }
    }
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Generic helper to append a record to a CSV file, writing headers only
/// when the file is new.
fn log_to_csv<T: Serialize>(filename: &str, record: &T) -> Result<(), Box<dyn Error>> {
    let file_exists = Path::new(filename).exists();
    let file = OpenOptions::new().append(true).create(true).open(filename)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

/// Appends one labelled run summary to the CSV log.
pub fn log_summary(filename: &str, label: &str, summary: &Summary) {
    let record = SummaryRecord::new(label, summary);
    if let Err(e) = log_to_csv(filename, &record) {
        eprintln!("Error logging run summary: {}", e);
    }
}

/// Writes the comparison as plain metric-name/value pairs in JSON.
pub fn write_comparison_json(
    filename: &str,
    comparison: &Comparison,
) -> Result<(), Box<dyn Error>> {
    let pairs: BTreeMap<&'static str, f64> = comparison.as_pairs().into_iter().collect();
    let file = File::create(filename)?;
    serde_json::to_writer_pretty(file, &pairs)?;
    Ok(())
}
