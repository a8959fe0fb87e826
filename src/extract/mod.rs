//! # Extraction Module
//!
//! Per-engine history extraction. Each engine module provides the SQL that
//! joins its visit table to its URL table, ordered by visit time, and a row
//! reader that turns one result row into a [`CanonicalRecord`].
//!
//! The engine is chosen once, when the [`Extraction`] is prepared. Rows are
//! then pulled lazily through [`Records`], which borrows the prepared
//! statement and so cannot outlive the [`HistoryStore`] it reads from.

pub mod chromium;
pub mod gecko;
pub mod webkit;

use std::fmt;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Row, Rows, Statement};
use serde::Serialize;
use tracing::debug;

use crate::error::HistoryError;
use crate::record::{CanonicalRecord, RecordContext};
use crate::store::HistoryStore;

/// Browser engine families with distinct history schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Gecko,
    Chromium,
    WebKit,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::Gecko, Engine::Chromium, Engine::WebKit];

    /// Tables that must all exist for a database to carry this schema.
    pub fn required_tables(self) -> &'static [&'static str] {
        match self {
            Engine::Gecko => &["moz_places", "moz_historyvisits"],
            Engine::Chromium => &["urls", "visits"],
            Engine::WebKit => &["history_items", "history_visits"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Engine::Gecko => "gecko",
            Engine::Chromium => "chromium",
            Engine::WebKit => "webkit",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type RowReader = fn(&Row<'_>, &RecordContext) -> Result<CanonicalRecord, HistoryError>;

/// Counters for one pass over a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub rows_read: u64,
    pub records: u64,
    pub invalid_timestamps: u64,
}

/// A prepared, engine-specific history query bound to a store.
pub struct Extraction<'store> {
    store: &'store HistoryStore,
    engine: Engine,
    stmt: Statement<'store>,
    ctx: RecordContext,
    read_row: RowReader,
}

impl<'store> Extraction<'store> {
    /// Prepare the query for `engine`. Tables or columns the file lacks
    /// surface here as `SchemaMismatch`.
    pub fn prepare(
        store: &'store HistoryStore,
        engine: Engine,
        ctx: RecordContext,
        include_description: bool,
    ) -> Result<Self, HistoryError> {
        let (sql, read_row): (String, RowReader) = match engine {
            Engine::Gecko => (gecko::query(store, include_description)?, gecko::read_row),
            Engine::Chromium => (chromium::QUERY.to_string(), chromium::read_row),
            Engine::WebKit => (webkit::QUERY.to_string(), webkit::read_row),
        };
        debug!("{} query: {}", engine, sql);
        let stmt = store.prepare(engine, &sql)?;
        Ok(Self {
            store,
            engine,
            stmt,
            ctx,
            read_row,
        })
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn source_path(&self) -> &Path {
        self.store.path()
    }

    pub fn data_type(&self) -> &str {
        &self.ctx.data_type
    }

    /// Start a single forward pass over the visits.
    pub fn records(&mut self) -> Result<Records<'_>, HistoryError> {
        let rows = self
            .stmt
            .query([])
            .map_err(|err| self.store.classify(self.engine, 0, err))?;
        Ok(Records {
            rows,
            store: self.store,
            engine: self.engine,
            ctx: &self.ctx,
            read_row: self.read_row,
            stats: ExtractStats::default(),
            done: false,
        })
    }
}

/// Lazy stream of records in ascending timestamp order.
///
/// Rows with a missing, non-numeric or out-of-range timestamp are skipped and
/// counted in [`ExtractStats::invalid_timestamps`]. Any other error is yielded
/// once and ends the stream.
pub struct Records<'a> {
    rows: Rows<'a>,
    store: &'a HistoryStore,
    engine: Engine,
    ctx: &'a RecordContext,
    read_row: RowReader,
    stats: ExtractStats,
    done: bool,
}

impl Records<'_> {
    pub fn stats(&self) -> ExtractStats {
        self.stats
    }

    fn fail(&mut self, err: HistoryError) -> Option<Result<CanonicalRecord, HistoryError>> {
        self.done = true;
        let err = match err {
            HistoryError::Sqlite(inner) => {
                self.store.classify(self.engine, self.stats.rows_read, inner)
            }
            other => other,
        };
        Some(Err(err))
    }
}

impl Iterator for Records<'_> {
    type Item = Result<CanonicalRecord, HistoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let row = match self.rows.next() {
                Ok(Some(row)) => row,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(err) => return self.fail(HistoryError::Sqlite(err)),
            };
            let result = (self.read_row)(row, self.ctx);
            self.stats.rows_read += 1;
            match result {
                Ok(record) => {
                    self.stats.records += 1;
                    return Some(Ok(record));
                }
                Err(HistoryError::InvalidTimestamp { engine, raw }) => {
                    self.stats.invalid_timestamps += 1;
                    debug!("skipping {} visit with invalid timestamp {}", engine, raw);
                }
                Err(err) => return self.fail(err),
            }
        }
    }
}

/// Error for a visit row whose time column is NULL.
pub(crate) fn missing_timestamp(engine: Engine) -> HistoryError {
    HistoryError::InvalidTimestamp {
        engine,
        raw: "NULL".to_string(),
    }
}

/// Visit time stored as INTEGER. Any other storage class is an invalid
/// timestamp for this row, not a failure of the whole pass.
pub(crate) fn integer_time(row: &Row<'_>, idx: usize, engine: Engine) -> Result<i64, HistoryError> {
    match row.get_ref(idx)? {
        ValueRef::Integer(raw) => Ok(raw),
        ValueRef::Null => Err(missing_timestamp(engine)),
        other => Err(bad_cell(engine, other)),
    }
}

/// Visit time stored as REAL, or INTEGER for whole seconds.
pub(crate) fn real_time(row: &Row<'_>, idx: usize, engine: Engine) -> Result<f64, HistoryError> {
    match row.get_ref(idx)? {
        ValueRef::Real(raw) => Ok(raw),
        ValueRef::Integer(raw) => Ok(raw as f64),
        ValueRef::Null => Err(missing_timestamp(engine)),
        other => Err(bad_cell(engine, other)),
    }
}

fn bad_cell(engine: Engine, value: ValueRef<'_>) -> HistoryError {
    let raw = match value {
        ValueRef::Text(bytes) => format!("text {:?}", String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => format!("blob of {} bytes", bytes.len()),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Null => "NULL".to_string(),
    };
    HistoryError::InvalidTimestamp { engine, raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::tempdir;

    #[test]
    fn engine_names() {
        assert_eq!(Engine::Gecko.to_string(), "gecko");
        assert_eq!(Engine::WebKit.to_string(), "webkit");
        assert_eq!(
            serde_json::to_string(&Engine::Chromium).expect("json"),
            "\"chromium\""
        );
    }

    #[test]
    fn non_numeric_time_cells_are_invalid_timestamps() {
        let conn = Connection::open_in_memory().expect("conn");
        let (text, blob, null, real, whole) = conn
            .query_row("SELECT 'garbage', x'0102', NULL, 1.5, 7", [], |row| {
                Ok((
                    integer_time(row, 0, Engine::Chromium),
                    real_time(row, 1, Engine::WebKit),
                    integer_time(row, 2, Engine::Gecko),
                    integer_time(row, 3, Engine::Gecko),
                    real_time(row, 4, Engine::WebKit),
                ))
            })
            .expect("row");

        match text {
            Err(HistoryError::InvalidTimestamp { engine, raw }) => {
                assert_eq!(engine, Engine::Chromium);
                assert!(raw.contains("garbage"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match blob {
            Err(HistoryError::InvalidTimestamp { raw, .. }) => assert_eq!(raw, "blob of 2 bytes"),
            other => panic!("unexpected {other:?}"),
        }
        match null {
            Err(HistoryError::InvalidTimestamp { raw, .. }) => assert_eq!(raw, "NULL"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(real, Err(HistoryError::InvalidTimestamp { .. })));
        assert_eq!(whole.expect("integer seconds"), 7.0);
    }

    #[test]
    fn wrong_engine_is_schema_mismatch() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("History.db");
        let conn = Connection::open(&path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE history_items (id INTEGER PRIMARY KEY, url TEXT);
             CREATE TABLE history_visits (id INTEGER PRIMARY KEY, history_item INTEGER, visit_time REAL);",
        )
        .expect("create");
        drop(conn);

        let store = HistoryStore::open_read_only(&path).expect("open");
        let ctx = RecordContext::new("chromium", "Visit Time", "Visited: ");
        let err = Extraction::prepare(&store, Engine::Chromium, ctx, true)
            .err()
            .expect("mismatch");
        assert!(matches!(
            err,
            HistoryError::SchemaMismatch {
                engine: Engine::Chromium,
                ..
            }
        ));
    }
}
