//! Export of a built index as JSON or JSON Lines.
//!
//! JSON writes one object mapping each label to its ranked hits. JSONL writes
//! one `{"label": ..., "hits": [...]}` record per line. Labels are emitted in
//! sorted order either way.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::index::TagIndex;
use crate::types::LabelHit;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Writes a [`TagIndex`] to any writer.
pub struct IndexWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> IndexWriter<W> {
    /// Create a new index writer. `pretty` only affects JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write the whole index, returning the number of labels written.
    pub fn write_index(&mut self, index: &TagIndex) -> io::Result<usize> {
        let records = index.records();
        match self.format {
            OutputFormat::Json => {
                let map: BTreeMap<&str, &[LabelHit]> =
                    records.iter().map(|r| (r.label, r.hits)).collect();
                self.write_value(&map, self.pretty)?;
            }
            OutputFormat::JsonLines => {
                // JSONL is never pretty-printed (one object per line)
                for record in &records {
                    self.write_value(record, false)?;
                }
            }
        }
        Ok(records.len())
    }

    fn write_value<T: Serialize + ?Sized>(&mut self, item: &T, pretty: bool) -> io::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TagIndexBuilder;

    fn sample_index() -> TagIndex {
        let mut builder = TagIndexBuilder::new();
        builder.insert("dog", LabelHit::new("b", 0.7));
        builder.insert("cat", LabelHit::new("a", 0.9));
        builder.insert("cat", LabelHit::new("c", 0.99));
        builder.finish(None)
    }

    #[test]
    fn test_write_json_object() {
        let mut writer = IndexWriter::new(Vec::new(), OutputFormat::Json, false);
        let written = writer.write_index(&sample_index()).unwrap();
        assert_eq!(written, 2);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["cat"][0]["image"], "c");
        assert_eq!(value["cat"][1]["image"], "a");
        assert_eq!(value["dog"][0]["confidence"], 0.7);
    }

    #[test]
    fn test_write_jsonl_records() {
        let mut writer = IndexWriter::new(Vec::new(), OutputFormat::JsonLines, true);
        writer.write_index(&sample_index()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"label":"cat""#));
        assert!(lines[1].starts_with(r#"{"label":"dog""#));
    }

    #[test]
    fn test_write_empty_index() {
        let mut writer = IndexWriter::new(Vec::new(), OutputFormat::Json, false);
        let written = writer.write_index(&TagIndex::default()).unwrap();
        assert_eq!(written, 0);
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "{}\n");
    }
}
