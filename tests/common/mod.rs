//! Shared fixtures for integration tests.
//!
//! Each builder writes a minimal history database with the tables and
//! columns the real browsers use, into a caller-owned temp directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use histsketch::config::{self, Config};
use histsketch::extract::Engine;
use histsketch::output::{self, OutputFormat};
use histsketch::pipeline::{self, Conversion};
use histsketch::store::HistoryStore;

pub const CHROMIUM_SCHEMA: &str = "
    CREATE TABLE meta (key LONGVARCHAR NOT NULL UNIQUE PRIMARY KEY, value LONGVARCHAR);
    CREATE TABLE urls (id INTEGER PRIMARY KEY AUTOINCREMENT, url LONGVARCHAR, title LONGVARCHAR,
        visit_count INTEGER DEFAULT 0 NOT NULL, typed_count INTEGER DEFAULT 0 NOT NULL,
        last_visit_time INTEGER NOT NULL, hidden INTEGER DEFAULT 0 NOT NULL);
    CREATE TABLE visits (id INTEGER PRIMARY KEY, url INTEGER NOT NULL, visit_time INTEGER NOT NULL,
        from_visit INTEGER, transition INTEGER DEFAULT 0 NOT NULL, segment_id INTEGER,
        visit_duration INTEGER DEFAULT 0 NOT NULL);
";

pub const GECKO_SCHEMA: &str = "
    CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR,
        rev_host LONGVARCHAR, visit_count INTEGER DEFAULT 0, hidden INTEGER DEFAULT 0 NOT NULL,
        typed INTEGER DEFAULT 0 NOT NULL, frecency INTEGER DEFAULT -1 NOT NULL,
        last_visit_date INTEGER, guid TEXT, description TEXT);
    CREATE TABLE moz_historyvisits (id INTEGER PRIMARY KEY, from_visit INTEGER, place_id INTEGER,
        visit_date INTEGER, visit_type INTEGER, session INTEGER);
";

pub const WEBKIT_SCHEMA: &str = "
    CREATE TABLE history_items (id INTEGER PRIMARY KEY AUTOINCREMENT, url TEXT NOT NULL UNIQUE,
        domain_expansion TEXT NULL, visit_count INTEGER NOT NULL);
    CREATE TABLE history_visits (id INTEGER PRIMARY KEY AUTOINCREMENT,
        history_item INTEGER NOT NULL REFERENCES history_items(id), visit_time REAL NOT NULL,
        title TEXT NULL, load_successful BOOLEAN NOT NULL DEFAULT 1);
";

pub fn create_db(dir: &Path, name: &str, schema: &str) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).expect("conn");
    conn.execute_batch(schema).expect("schema");
    path
}

/// Two URLs, three visits; the visit at raw time 42 predates 1970.
pub fn chromium_history(dir: &Path) -> PathBuf {
    let path = create_db(dir, "History", CHROMIUM_SCHEMA);
    let conn = Connection::open(&path).expect("conn");
    conn.execute_batch(
        "INSERT INTO urls (id, url, title, visit_count, typed_count, last_visit_time)
             VALUES (1, 'https://example.com/', 'Example Domain', 2, 1, 13300000000000000);
         INSERT INTO urls (id, url, title, visit_count, typed_count, last_visit_time)
             VALUES (2, 'https://news.example.org/', '', 1, 0, 13300000500000000);
         INSERT INTO visits (id, url, visit_time, transition, visit_duration)
             VALUES (1, 2, 13300000500000000, 805306368, 0);
         INSERT INTO visits (id, url, visit_time, transition, visit_duration)
             VALUES (2, 1, 13300000000000000, 1, 1500000);
         INSERT INTO visits (id, url, visit_time, transition, visit_duration)
             VALUES (3, 1, 42, 0, 0);",
    )
    .expect("insert");
    path
}

pub fn gecko_places(dir: &Path) -> PathBuf {
    let path = create_db(dir, "places.sqlite", GECKO_SCHEMA);
    let conn = Connection::open(&path).expect("conn");
    conn.execute_batch(
        "INSERT INTO moz_places (id, url, title, description)
             VALUES (1, 'https://www.mozilla.org/', 'Mozilla', NULL);
         INSERT INTO moz_places (id, url, title, description)
             VALUES (2, 'https://example.net/', NULL, NULL);
         INSERT INTO moz_historyvisits (id, from_visit, place_id, visit_date, visit_type)
             VALUES (1, 0, 1, 1700000000000000, 2);
         INSERT INTO moz_historyvisits (id, from_visit, place_id, visit_date, visit_type)
             VALUES (2, 1, 2, 1700000060000000, 1);",
    )
    .expect("insert");
    path
}

pub fn webkit_history(dir: &Path) -> PathBuf {
    let path = create_db(dir, "History.db", WEBKIT_SCHEMA);
    let conn = Connection::open(&path).expect("conn");
    conn.execute_batch(
        "INSERT INTO history_items (id, url, visit_count) VALUES (1, 'https://www.apple.com/', 1);
         INSERT INTO history_visits (history_item, visit_time, title) VALUES (1, 721820800.25, 'Apple');",
    )
    .expect("insert");
    path
}

pub fn test_config() -> Config {
    let mut cfg = config::load_config(None).expect("config").config;
    cfg.run_id = "test_run".to_string();
    cfg
}

/// Detect (unless `explicit`), prepare, convert to `format`, return the
/// output path and conversion counters. The output file is only created once
/// the query is prepared.
pub fn run_to_file(
    source: &Path,
    out_dir: &Path,
    format: OutputFormat,
    explicit: Option<Engine>,
    browser_name: Option<&str>,
) -> anyhow::Result<(PathBuf, Conversion)> {
    let cfg = test_config();
    let store = HistoryStore::open_read_only(source)?;
    let engine = pipeline::resolve_engine(&store, explicit)?;
    let out_path = out_dir.join(match format {
        OutputFormat::Csv => "timeline.csv",
        OutputFormat::Jsonl => "timeline.jsonl",
    });
    let mut extraction = pipeline::prepare(&store, &cfg, engine, browser_name)?;
    let mut sink = output::build_sink(format, &out_path)?;
    let conversion = pipeline::convert(&mut extraction, sink.as_mut())?;
    Ok((out_path, conversion))
}

pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("reader");
    let header = reader
        .headers()
        .expect("header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("row").iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}
