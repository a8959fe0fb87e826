//! Browser history to timeline conversion.
//!
//! Reads Gecko (`places.sqlite`), Chromium (`History`) and WebKit
//! (`History.db`) history databases read-only and writes every visit as one
//! row of a Timesketch-compatible timeline with Unix-microsecond timestamps.

pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod time;
pub mod util;
