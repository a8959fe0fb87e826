use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserEngine {
    /// Gecko: Firefox, Waterfox, LibreWolf (places.sqlite)
    #[value(alias = "gecko")]
    Firefox,
    /// Chromium: Chrome, Edge, Brave, Opera, Vivaldi (History)
    Chromium,
    /// WebKit: Safari (History.db)
    #[value(alias = "webkit")]
    Safari,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineFormat {
    Csv,
    Jsonl,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    after_help = "Close the browser before running, or work on a copy of the database, \
                  to avoid lock errors."
)]
pub struct CliOptions {
    /// Browser history database (places.sqlite, History, History.db)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Browser engine; detected from the database tables when omitted
    #[arg(short, long, value_enum)]
    pub browser: Option<BrowserEngine>,

    /// Output timeline file
    #[arg(short, long, default_value = "browser_history_timesketch.csv")]
    pub output: PathBuf,

    /// Custom browser name for the data_type field (e.g. "Brave", "Edge")
    #[arg(long, value_parser = non_empty)]
    pub browser_name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = TimelineFormat::Csv)]
    pub format: TimelineFormat,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Compute the SHA-256 of the input database for the run summary
    #[arg(long)]
    pub hash_source: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("browser name must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
