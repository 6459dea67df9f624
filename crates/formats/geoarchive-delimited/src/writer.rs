//! Delimited archive writer.
//!
//! Values are written with their plain text form: no quoting and no escaping. A value
//! that contains the delimiter shifts the following columns of its row.

use std::io::{self, Write as IoWrite};

use geoarchive_core_common::Record;

use crate::preamble::Preamble;

/// Name of the synthetic first column holding the WKT geometry.
pub const GEOMETRY_COLUMN: &str = "Shape@WKT";

/// Options for delimited archive writing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedWriterOptions {
    /// Field delimiter (default: `|`)
    pub delimiter: String,
    /// Whether every value of a data row, the last one included, is followed by the
    /// delimiter (default: true, the legacy layout)
    pub trailing_delimiter: bool,
    /// Text written for missing values (default: `None`)
    pub null_value: String,
}

impl Default for DelimitedWriterOptions {
    fn default() -> Self {
        Self {
            delimiter: "|".to_string(),
            trailing_delimiter: true,
            null_value: "None".to_string(),
        }
    }
}

impl DelimitedWriterOptions {
    /// Create new writer options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set whether data rows end with a delimiter
    #[must_use]
    pub fn with_trailing_delimiter(mut self, trailing_delimiter: bool) -> Self {
        self.trailing_delimiter = trailing_delimiter;
        self
    }

    /// Set null value representation
    #[must_use]
    pub fn with_null_value(mut self, null_value: impl Into<String>) -> Self {
        self.null_value = null_value.into();
        self
    }
}

/// Header column names: [`GEOMETRY_COLUMN`] followed by `fields`.
#[must_use]
pub fn header_fields(fields: &[String]) -> Vec<String> {
    let mut header = Vec::with_capacity(fields.len() + 1);
    header.push(GEOMETRY_COLUMN.to_string());
    header.extend(fields.iter().cloned());
    header
}

/// Streaming writer for one delimited archive file.
///
/// Call [`write_preamble`](Self::write_preamble), then [`write_header`](Self::write_header),
/// then [`write_record`](Self::write_record) for every record, then
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct DelimitedWriter<W: IoWrite> {
    inner: W,
    options: DelimitedWriterOptions,
    rows: u64,
}

impl<W: IoWrite> DelimitedWriter<W> {
    /// Wrap `inner`.
    pub fn new(inner: W, options: DelimitedWriterOptions) -> Self {
        Self {
            inner,
            options,
            rows: 0,
        }
    }

    /// Number of data rows written so far.
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Write the metadata preamble, one line per item.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn write_preamble(&mut self, preamble: &Preamble) -> io::Result<()> {
        for line in preamble.lines(&self.options.delimiter) {
            self.inner.write_all(line.as_bytes())?;
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Write the header row: the geometry column followed by `fields`, joined by the
    /// delimiter.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn write_header(&mut self, fields: &[String]) -> io::Result<()> {
        let header = header_fields(fields).join(&self.options.delimiter);
        self.inner.write_all(header.as_bytes())?;
        self.inner.write_all(b"\n")
    }

    /// Write one data row: geometry WKT first, then the attribute values.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn write_record(&mut self, record: &Record) -> io::Result<()> {
        let null = self.options.null_value.as_str();
        let delimiter = self.options.delimiter.as_bytes();

        let geometry = record.geometry_wkt.as_deref().unwrap_or(null);
        let values = std::iter::once(std::borrow::Cow::Borrowed(geometry))
            .chain(record.values.iter().map(|value| value.render(null)));

        for (idx, value) in values.enumerate() {
            if idx > 0 && !self.options.trailing_delimiter {
                self.inner.write_all(delimiter)?;
            }
            self.inner.write_all(value.as_bytes())?;
            if self.options.trailing_delimiter {
                self.inner.write_all(delimiter)?;
            }
        }
        self.inner.write_all(b"\n")?;

        self.rows += 1;
        Ok(())
    }

    /// Flush buffered output and hand back the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write a complete delimited archive in one call.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns an error if writing to the output fails
pub fn write_delimited<W: IoWrite>(
    writer: &mut W,
    preamble: &Preamble,
    fields: &[String],
    records: &[Record],
    options: &DelimitedWriterOptions,
) -> io::Result<u64> {
    let mut delimited = DelimitedWriter::new(writer, options.clone());
    delimited.write_preamble(preamble)?;
    delimited.write_header(fields)?;
    for record in records {
        delimited.write_record(record)?;
    }
    let rows = delimited.rows();
    delimited.finish()?;
    Ok(rows)
}

/// Write a complete delimited archive to bytes
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn write_delimited_to_bytes(
    preamble: &Preamble,
    fields: &[String],
    records: &[Record],
    options: &DelimitedWriterOptions,
) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_delimited(&mut buffer, preamble, fields, records, options)?;
    Ok(buffer)
}
