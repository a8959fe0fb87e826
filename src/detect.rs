//! Engine detection from the table catalog.

use std::collections::BTreeSet;

use tracing::info;

use crate::error::HistoryError;
use crate::extract::Engine;
use crate::store::HistoryStore;

pub fn detect_engine(store: &HistoryStore) -> Result<Engine, HistoryError> {
    let tables = store.tables()?;
    let candidates = matching_engines(&tables);
    match candidates.as_slice() {
        [engine] => {
            info!("detected {} history schema in {}", engine, store.path().display());
            Ok(*engine)
        }
        [] => Err(HistoryError::UnknownSchema {
            path: store.path().to_path_buf(),
            tables,
        }),
        _ => Err(HistoryError::AmbiguousSchema {
            path: store.path().to_path_buf(),
            candidates,
            tables,
        }),
    }
}

/// Every engine whose required tables are all present.
pub fn matching_engines(tables: &BTreeSet<String>) -> Vec<Engine> {
    Engine::ALL
        .into_iter()
        .filter(|engine| {
            engine
                .required_tables()
                .iter()
                .all(|table| tables.contains(*table))
        })
        .collect()
}
