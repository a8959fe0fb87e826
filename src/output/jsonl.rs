use std::io::{BufWriter, Write};

use crate::output::{OutputError, TimelineRow, TimelineSink};
use crate::record::CanonicalRecord;

/// One JSON object per line, same keys as the CSV header. Absent optional
/// fields are written as `null`.
pub struct JsonlSink<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
        }
    }

    pub fn into_inner(self) -> Result<W, OutputError> {
        self.writer
            .into_inner()
            .map_err(|err| OutputError::Io(err.into_error()))
    }
}

impl<W: Write> TimelineSink for JsonlSink<W> {
    fn write_record(&mut self, record: &CanonicalRecord) -> Result<(), OutputError> {
        serde_json::to_writer(&mut self.writer, &TimelineRow::from(record))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::COLUMNS;
    use crate::record::RecordContext;
    use crate::time::gecko_to_unix_us;
    use serde_json::Value;

    #[test]
    fn writes_every_column_as_a_key() {
        let ctx = RecordContext::new("firefox", "Visit Time", "Visited: ");
        let record = ctx.record(
            gecko_to_unix_us(1_700_000_000_000_000).unwrap(),
            "https://example.com".into(),
            "Example".into(),
            None,
            Some(2),
            None,
        );

        let mut sink = JsonlSink::new(Vec::new());
        sink.write_record(&record).expect("write");
        sink.finish().expect("finish");
        let bytes = sink.into_inner().expect("inner");
        let text = String::from_utf8(bytes).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: Value = serde_json::from_str(lines[0]).expect("json");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), COLUMNS.len());
        for key in COLUMNS {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["visit_type"], Value::from(2));
        assert_eq!(obj["typed_count"], Value::Null);
        assert_eq!(obj["datetime"], Value::from("2023-11-14T22:13:20Z"));
    }
}
