use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::extract::Engine;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(
        "history database unavailable: {path} ({reason}); close the browser or copy the file and retry"
    )]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("no known browser history schema in {path}; tables found: {}; pass -b to select an engine", join_tables(.tables))]
    UnknownSchema {
        path: PathBuf,
        tables: BTreeSet<String>,
    },

    #[error("ambiguous history schema in {path}: matches {}; tables found: {}; pass -b to select an engine", join_engines(.candidates), join_tables(.tables))]
    AmbiguousSchema {
        path: PathBuf,
        candidates: Vec<Engine>,
        tables: BTreeSet<String>,
    },

    #[error("{path} does not look like a {engine} history database after {rows_processed} rows: {detail}")]
    SchemaMismatch {
        path: PathBuf,
        engine: Engine,
        rows_processed: u64,
        detail: String,
    },

    #[error("invalid {engine} timestamp: {raw}")]
    InvalidTimestamp { engine: Engine, raw: String },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

fn join_tables(tables: &BTreeSet<String>) -> String {
    if tables.is_empty() {
        return "(none)".to_string();
    }
    tables.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn join_engines(engines: &[Engine]) -> String {
    engines
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
