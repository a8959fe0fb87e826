//! # Pipeline Module
//!
//! Runs one conversion: resolve the engine (explicit or detected), prepare
//! its query, stream the engine's visits through the sink, and report what was written and
//! what was skipped. Strictly sequential; the sink sees records in the order
//! the store yields them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::detect::detect_engine;
use crate::error::HistoryError;
use crate::extract::{Engine, ExtractStats, Extraction};
use crate::output::TimelineSink;
use crate::record::RecordContext;
use crate::store::HistoryStore;

/// Outcome of a run, written as JSON when a summary path is requested.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub engine: Engine,
    pub data_type: String,
    pub source_path: PathBuf,
    pub source_sha256: Option<String>,
    pub rows_read: u64,
    pub records_written: u64,
    pub invalid_timestamps_skipped: u64,
    pub tool_version: String,
    pub config_hash: String,
}

/// Result of [`convert`]: the engine actually used and the pass counters.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub engine: Engine,
    pub data_type: String,
    pub stats: ExtractStats,
}

/// Explicit selection is trusted as-is; otherwise the catalog decides.
pub fn resolve_engine(store: &HistoryStore, explicit: Option<Engine>) -> Result<Engine, HistoryError> {
    match explicit {
        Some(engine) => {
            info!("using {} schema as requested", engine);
            Ok(engine)
        }
        None => detect_engine(store),
    }
}

/// Prepare the `engine` query against `store`. A store that does not carry
/// the engine's schema fails here, before any output exists.
pub fn prepare<'store>(
    store: &'store HistoryStore,
    cfg: &Config,
    engine: Engine,
    browser_name: Option<&str>,
) -> Result<Extraction<'store>, HistoryError> {
    let label = browser_name.unwrap_or_else(|| cfg.default_label(engine));
    let ctx = RecordContext::new(label, &cfg.timestamp_desc, &cfg.message_prefix);
    Extraction::prepare(store, engine, ctx, cfg.include_description)
}

/// Stream every visit of a prepared extraction into `sink`, then flush it.
pub fn convert(extraction: &mut Extraction<'_>, sink: &mut dyn TimelineSink) -> Result<Conversion> {
    let engine = extraction.engine();
    let source = extraction.source_path().to_path_buf();
    let data_type = extraction.data_type().to_string();
    let mut records = extraction.records()?;
    for record in records.by_ref() {
        let record = record?;
        sink.write_record(&record).with_context(|| {
            format!("writing record at {}", record.timestamp_iso)
        })?;
    }
    let stats = records.stats();
    sink.finish().context("flushing timeline output")?;

    info!(
        "converted {} {} visits from {} ({} rows read)",
        stats.records,
        engine,
        source.display(),
        stats.rows_read
    );
    if stats.invalid_timestamps > 0 {
        warn!(
            "skipped {} visits with invalid timestamps in {}",
            stats.invalid_timestamps,
            source.display()
        );
    }

    Ok(Conversion {
        engine,
        data_type,
        stats,
    })
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating summary {}", path.display()))?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
