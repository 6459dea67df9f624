//! Human-readable delimited archive format.
//!
//! An archive file starts with a fixed metadata [`Preamble`], followed by a header row
//! whose first column is [`GEOMETRY_COLUMN`], followed by one row per record.
//!
//! ```
//! use geoarchive_core_common::{FieldValue, Record};
//! use geoarchive_delimited::{DelimitedWriterOptions, Preamble, write_delimited_to_bytes};
//!
//! let fields = vec!["Name".to_string()];
//! let records = vec![Record::new(
//!     Some("POINT(1 2)".to_string()),
//!     vec![FieldValue::Text("Camp".to_string())],
//! )];
//! let bytes = write_delimited_to_bytes(
//!     &Preamble::default(),
//!     &fields,
//!     &records,
//!     &DelimitedWriterOptions::default(),
//! )
//! .unwrap();
//! let text = String::from_utf8(bytes).unwrap();
//! assert!(text.ends_with("Shape@WKT|Name\nPOINT(1 2)|Camp|\n"));
//! ```

pub mod preamble;
pub mod writer;

pub use preamble::{Preamble, delimiter_note, disclosure};
pub use writer::{
    DelimitedWriter, DelimitedWriterOptions, GEOMETRY_COLUMN, header_fields, write_delimited,
    write_delimited_to_bytes,
};
