//! Read-only access to a browser history database.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, ErrorCode, OpenFlags, Statement};
use tracing::debug;

use crate::error::HistoryError;
use crate::extract::Engine;

/// An opened history database. The connection is closed when the store is
/// dropped, on success and error paths alike.
pub struct HistoryStore {
    conn: Connection,
    path: PathBuf,
}

impl HistoryStore {
    /// Open without write access so a running browser's lock is left alone.
    pub fn open_read_only(path: &Path) -> Result<Self, HistoryError> {
        if !path.is_file() {
            return Err(HistoryError::SourceUnavailable {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| unavailable(path, &err))?;
        debug!("opened {} read-only", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all tables in the database catalog.
    pub fn tables(&self) -> Result<BTreeSet<String>, HistoryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .map_err(|err| unavailable(&self.path, &err))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|err| unavailable(&self.path, &err))?;

        let mut out = BTreeSet::new();
        for name in rows {
            out.insert(name.map_err(|err| unavailable(&self.path, &err))?);
        }
        Ok(out)
    }

    /// Whether `table` has a column named `column`.
    pub fn has_column(&self, table: &str, column: &str) -> Result<bool, HistoryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2")
            .map_err(|err| unavailable(&self.path, &err))?;
        let mut rows = stmt
            .query([table, column])
            .map_err(|err| unavailable(&self.path, &err))?;
        Ok(rows
            .next()
            .map_err(|err| unavailable(&self.path, &err))?
            .is_some())
    }

    /// Prepare an extraction query. A statement naming tables or columns the
    /// file does not have fails with `SchemaMismatch`.
    pub(crate) fn prepare(&self, engine: Engine, sql: &str) -> Result<Statement<'_>, HistoryError> {
        self.conn
            .prepare(sql)
            .map_err(|err| self.classify(engine, 0, err))
    }

    /// Map a SQLite error raised while reading `engine` data to the error
    /// taxonomy: lock and I/O conditions are `SourceUnavailable`, everything
    /// that SQLite reports as a generic statement error is `SchemaMismatch`.
    pub(crate) fn classify(&self, engine: Engine, rows_processed: u64, err: rusqlite::Error) -> HistoryError {
        match sqlite_code(&err) {
            Some(ErrorCode::Unknown) => HistoryError::SchemaMismatch {
                path: self.path.clone(),
                engine,
                rows_processed,
                detail: err.to_string(),
            },
            Some(_) => unavailable(&self.path, &err),
            None => HistoryError::Sqlite(err),
        }
    }
}

fn sqlite_code(err: &rusqlite::Error) -> Option<ErrorCode> {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => Some(inner.code),
        _ => None,
    }
}

fn unavailable(path: &Path, err: &rusqlite::Error) -> HistoryError {
    HistoryError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
