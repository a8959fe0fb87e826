//! # Utility Module
//!
//! Glue between the command line and the library: enum conversions and
//! source file hashing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::cli::{BrowserEngine, TimelineFormat};
use crate::extract::Engine;
use crate::output::OutputFormat;

/// Convert CLI engine selection to internal enum
pub fn engine_from_cli(browser: BrowserEngine) -> Engine {
    match browser {
        BrowserEngine::Firefox => Engine::Gecko,
        BrowserEngine::Chromium => Engine::Chromium,
        BrowserEngine::Safari => Engine::WebKit,
    }
}

/// Convert CLI output format to internal enum
pub fn format_from_cli(format: TimelineFormat) -> OutputFormat {
    match format {
        TimelineFormat::Csv => OutputFormat::Csv,
        TimelineFormat::Jsonl => OutputFormat::Jsonl,
    }
}

/// Hex SHA-256 of a file, read in fixed-size blocks.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
