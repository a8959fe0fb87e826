use rusqlite::Row;

use crate::error::HistoryError;
use crate::extract::{Engine, real_time};
use crate::record::{CanonicalRecord, RecordContext};
use crate::time::webkit_to_unix_us;

// history_items has no title column; titles live per visit and are not
// carried into the timeline.
pub(crate) const QUERY: &str = "SELECT history_visits.visit_time, history_items.url \
     FROM history_visits JOIN history_items ON history_visits.history_item = history_items.id \
     ORDER BY history_visits.visit_time, history_visits.id";

pub(crate) fn read_row(row: &Row<'_>, ctx: &RecordContext) -> Result<CanonicalRecord, HistoryError> {
    let timestamp = webkit_to_unix_us(real_time(row, 0, Engine::WebKit)?)?;
    let url: Option<String> = row.get(1)?;

    Ok(ctx.record(
        timestamp,
        url.unwrap_or_default(),
        String::new(),
        None,
        None,
        None,
    ))
}
