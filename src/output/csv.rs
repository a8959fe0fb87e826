use std::io::Write;

use crate::output::{COLUMNS, OutputError, TimelineRow, TimelineSink};
use crate::record::CanonicalRecord;

/// Timesketch-style CSV. Optional columns are written as empty fields.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    /// Wrap `inner` and write the header row.
    pub fn new(inner: W) -> Result<Self, OutputError> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record(COLUMNS)?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> Result<W, OutputError> {
        self.writer
            .into_inner()
            .map_err(|err| OutputError::Io(err.into_error()))
    }
}

impl<W: Write> TimelineSink for CsvSink<W> {
    fn write_record(&mut self, record: &CanonicalRecord) -> Result<(), OutputError> {
        self.writer.serialize(TimelineRow::from(record))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}
