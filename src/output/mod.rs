pub mod csv;
pub mod jsonl;

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::record::CanonicalRecord;

/// Output column order; every row carries all of them.
pub const COLUMNS: [&str; 11] = [
    "timestamp",
    "datetime",
    "timestamp_desc",
    "message",
    "url",
    "title",
    "data_type",
    "visit_type",
    "visit_duration_us",
    "total_visits",
    "typed_count",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Destination for the timeline, fed one record at a time.
pub trait TimelineSink {
    fn write_record(&mut self, record: &CanonicalRecord) -> Result<(), OutputError>;
    fn finish(&mut self) -> Result<(), OutputError>;
}

/// Flat view of a record in [`COLUMNS`] order. Field names match the column
/// names, so the same struct drives the CSV and JSONL sinks.
#[derive(Serialize)]
pub(crate) struct TimelineRow<'a> {
    timestamp: i64,
    datetime: &'a str,
    timestamp_desc: &'a str,
    message: &'a str,
    url: &'a str,
    title: &'a str,
    data_type: &'a str,
    visit_type: Option<i64>,
    visit_duration_us: Option<i64>,
    total_visits: Option<i64>,
    typed_count: Option<i64>,
}

impl<'a> From<&'a CanonicalRecord> for TimelineRow<'a> {
    fn from(record: &'a CanonicalRecord) -> Self {
        Self {
            timestamp: record.timestamp_unix_us(),
            datetime: &record.timestamp_iso,
            timestamp_desc: &record.timestamp_desc,
            message: &record.message,
            url: &record.url,
            title: &record.title,
            data_type: &record.data_type,
            visit_type: record.visit_type,
            visit_duration_us: record.chromium.map(|c| c.visit_duration_us),
            total_visits: record.chromium.map(|c| c.total_visits),
            typed_count: record.chromium.map(|c| c.typed_count),
        }
    }
}

/// Create a fresh output file at `path`, truncating any previous run's file.
pub fn build_sink(format: OutputFormat, path: &Path) -> Result<Box<dyn TimelineSink>, OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    match format {
        OutputFormat::Csv => Ok(Box::new(csv::CsvSink::new(file)?)),
        OutputFormat::Jsonl => Ok(Box::new(jsonl::JsonlSink::new(file))),
    }
}
