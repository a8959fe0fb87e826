use rusqlite::Row;

use crate::error::HistoryError;
use crate::extract::{Engine, integer_time};
use crate::record::{CanonicalRecord, ChromiumVisitStats, RecordContext};
use crate::time::chromium_to_unix_us;

pub(crate) const QUERY: &str = "SELECT visits.visit_time, urls.url, urls.title, visits.transition, \
     visits.visit_duration, urls.visit_count, urls.typed_count \
     FROM visits JOIN urls ON visits.url = urls.id \
     ORDER BY visits.visit_time, visits.id";

/// The low byte of `visits.transition` is the core transition type; the
/// high bits are qualifiers (redirect chain markers, forward/back, ...).
const CORE_TRANSITION_MASK: i64 = 0xFF;

pub(crate) fn read_row(row: &Row<'_>, ctx: &RecordContext) -> Result<CanonicalRecord, HistoryError> {
    let timestamp = chromium_to_unix_us(integer_time(row, 0, Engine::Chromium)?)?;
    let url: Option<String> = row.get(1)?;
    let title: Option<String> = row.get(2)?;
    let transition: Option<i64> = row.get(3)?;
    let visit_duration: Option<i64> = row.get(4)?;
    let visit_count: Option<i64> = row.get(5)?;
    let typed_count: Option<i64> = row.get(6)?;

    // NULL counters on a Chromium row mean "never set", which Chromium
    // itself treats as zero.
    let stats = ChromiumVisitStats {
        visit_duration_us: visit_duration.unwrap_or(0),
        total_visits: visit_count.unwrap_or(0),
        typed_count: typed_count.unwrap_or(0),
    };

    Ok(ctx.record(
        timestamp,
        url.unwrap_or_default(),
        title.unwrap_or_default(),
        None,
        transition.map(|t| t & CORE_TRANSITION_MASK),
        Some(stats),
    ))
}
