use serde::Serialize;

use crate::time::UnixMicros;

/// Counters only Chromium keeps per visit. Absent as a group for other
/// engines; zero is a real value here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChromiumVisitStats {
    pub visit_duration_us: i64,
    pub total_visits: i64,
    pub typed_count: i64,
}

/// One browsing visit, independent of the engine that recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    pub timestamp: UnixMicros,
    pub timestamp_iso: String,
    pub timestamp_desc: String,
    pub message: String,
    pub url: String,
    pub title: String,
    pub data_type: String,
    pub visit_type: Option<i64>,
    pub chromium: Option<ChromiumVisitStats>,
}

impl CanonicalRecord {
    pub fn timestamp_unix_us(&self) -> i64 {
        self.timestamp.as_i64()
    }
}

/// Per-run values shared by every record an extractor builds.
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub data_type: String,
    pub timestamp_desc: String,
    pub message_prefix: String,
}

impl RecordContext {
    pub fn new(label: &str, timestamp_desc: &str, message_prefix: &str) -> Self {
        Self {
            data_type: data_type_for(label),
            timestamp_desc: timestamp_desc.to_string(),
            message_prefix: message_prefix.to_string(),
        }
    }

    /// Build a record. The message uses the title, or the URL when the title
    /// is empty; a non-empty `detail` is appended after ` - `.
    pub fn record(
        &self,
        timestamp: UnixMicros,
        url: String,
        title: String,
        detail: Option<&str>,
        visit_type: Option<i64>,
        chromium: Option<ChromiumVisitStats>,
    ) -> CanonicalRecord {
        let subject = if title.is_empty() { &url } else { &title };
        let mut message = format!("{}{}", self.message_prefix, subject);
        if let Some(detail) = detail.filter(|d| !d.is_empty()) {
            message.push_str(" - ");
            message.push_str(detail);
        }
        CanonicalRecord {
            timestamp,
            timestamp_iso: timestamp.to_iso8601(),
            timestamp_desc: self.timestamp_desc.clone(),
            message,
            url,
            title,
            data_type: self.data_type.clone(),
            visit_type,
            chromium,
        }
    }
}

/// `data_type` tag for a browser label; the label is kept verbatim.
pub fn data_type_for(label: &str) -> String {
    format!("{label}:history:visit")
}
