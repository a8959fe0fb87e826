use rusqlite::Row;

use crate::error::HistoryError;
use crate::extract::{Engine, integer_time};
use crate::record::{CanonicalRecord, RecordContext};
use crate::store::HistoryStore;
use crate::time::gecko_to_unix_us;

/// Build the visit query. `moz_places.description` only exists in newer
/// profiles, so it is selected when present and replaced by NULL otherwise.
pub(crate) fn query(store: &HistoryStore, include_description: bool) -> Result<String, HistoryError> {
    let description = if include_description && store.has_column("moz_places", "description")? {
        "moz_places.description"
    } else {
        "NULL"
    };
    Ok(format!(
        "SELECT moz_historyvisits.visit_date, moz_places.url, moz_places.title, {description}, \
         moz_historyvisits.visit_type \
         FROM moz_historyvisits JOIN moz_places ON moz_historyvisits.place_id = moz_places.id \
         ORDER BY moz_historyvisits.visit_date, moz_historyvisits.id"
    ))
}

pub(crate) fn read_row(row: &Row<'_>, ctx: &RecordContext) -> Result<CanonicalRecord, HistoryError> {
    let timestamp = gecko_to_unix_us(integer_time(row, 0, Engine::Gecko)?)?;
    let url: Option<String> = row.get(1)?;
    let title: Option<String> = row.get(2)?;
    let description: Option<String> = row.get(3)?;
    let visit_type: Option<i64> = row.get(4)?;

    Ok(ctx.record(
        timestamp,
        url.unwrap_or_default(),
        title.unwrap_or_default(),
        description.as_deref(),
        visit_type,
        None,
    ))
}
