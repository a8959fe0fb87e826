//! # Timestamp Conversion
//!
//! Maps each engine's raw visit time onto one time base: microseconds since
//! the Unix epoch, as [`UnixMicros`].
//!
//! | engine   | unit          | epoch      |
//! |----------|---------------|------------|
//! | Gecko    | microseconds  | 1970-01-01 |
//! | Chromium | microseconds  | 1601-01-01 |
//! | WebKit   | seconds (f64) | 2001-01-01 |

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::HistoryError;
use crate::extract::Engine;

/// Microseconds between 1601-01-01 and 1970-01-01.
pub const WINDOWS_EPOCH_OFFSET_US: i64 = 11_644_473_600_000_000;

/// Seconds between 1970-01-01 and 2001-01-01.
pub const COCOA_EPOCH_OFFSET_SECS: i64 = 978_307_200;

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Non-negative microseconds since 1970-01-01T00:00:00Z, always within the
/// calendar range chrono can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixMicros(DateTime<Utc>);

impl UnixMicros {
    pub fn as_i64(self) -> i64 {
        self.0.timestamp_micros()
    }

    /// ISO-8601 UTC with second precision, e.g. `2022-06-18T04:26:40Z`.
    pub fn to_iso8601(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn checked(engine: Engine, value: i64, raw: impl ToString) -> Result<Self, HistoryError> {
        if value < 0 {
            return Err(invalid(engine, raw));
        }
        match DateTime::<Utc>::from_timestamp_micros(value) {
            Some(dt) => Ok(Self(dt)),
            None => Err(invalid(engine, raw)),
        }
    }
}

pub fn gecko_to_unix_us(raw: i64) -> Result<UnixMicros, HistoryError> {
    UnixMicros::checked(Engine::Gecko, raw, raw)
}

pub fn chromium_to_unix_us(raw: i64) -> Result<UnixMicros, HistoryError> {
    let value = raw
        .checked_sub(WINDOWS_EPOCH_OFFSET_US)
        .ok_or_else(|| invalid(Engine::Chromium, raw))?;
    UnixMicros::checked(Engine::Chromium, value, raw)
}

/// Truncates toward zero; sub-microsecond fractions are dropped, never rounded.
pub fn webkit_to_unix_us(raw: f64) -> Result<UnixMicros, HistoryError> {
    if !raw.is_finite() {
        return Err(invalid(Engine::WebKit, raw));
    }
    let micros = ((raw + COCOA_EPOCH_OFFSET_SECS as f64) * MICROS_PER_SEC).trunc();
    // i64::MAX as f64 rounds up to 2^63, so the bound must be exclusive.
    if !(0.0..i64::MAX as f64).contains(&micros) {
        return Err(invalid(Engine::WebKit, raw));
    }
    UnixMicros::checked(Engine::WebKit, micros as i64, raw)
}

fn invalid(engine: Engine, raw: impl ToString) -> HistoryError {
    HistoryError::InvalidTimestamp {
        engine,
        raw: raw.to_string(),
    }
}
