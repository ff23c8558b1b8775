//! DICX codec: the dense, comma-separated dictionary format.
//!
//! ```text
//! DicTerm,negemo,posemo
//! bittersweet,X,X
//! happy,,X
//! ```
//!
//! The first column must be labelled `DicTerm` and holds the terms; every
//! other column is a category, including one that happens to be named
//! `DicTerm`.
//! A non-blank cell marks membership; a blank or absent cell does not.
//! Fields are quoted only when needed and lines end with `\n`.

use std::path::Path;

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::storage::dictionary_table::{CellValue, DictionaryTable, TableFrame, TERM_AXIS};
use crate::utils::io_utils::{skip_utf8_bom, text_from_file};
use crate::{DxError, Result};

/// Conventional membership marker.
pub const DEFAULT_MARKER: char = 'X';

/// Options for writing DICX files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DicxWriteOptions {
    /// Glyph written into member cells
    pub marker: char,
}

impl Default for DicxWriteOptions {
    fn default() -> Self {
        Self { marker: DEFAULT_MARKER }
    }
}

/// Decodes DICX text into an unvalidated frame.
///
/// # Errors
///
/// Returns `MalformedFormat` if the header is missing or does not start with
/// `DicTerm`, or if a row has more fields than the header.
pub fn decode_dicx(text: &str) -> Result<TableFrame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(skip_utf8_bom(text).as_bytes());
    let mut records = reader.records();

    let header = match records.next() {
        Some(header) => header?,
        None => return Err(DxError::malformed_format("DICX file has no header row")),
    };
    if header.get(0) != Some(TERM_AXIS) {
        return Err(DxError::malformed_format(format!(
            "DICX header must start with {}, got {:?}",
            TERM_AXIS,
            header.get(0).unwrap_or_default()
        )));
    }
    let categories = header.iter().skip(1).map(str::to_string).collect();

    let mut frame = TableFrame::new(categories);
    for (row_no, record) in records.enumerate() {
        let record = record?;
        if record.len() > header.len() {
            return Err(DxError::malformed_format(format!(
                "row {}: {} fields but the header has {}",
                row_no + 2,
                record.len(),
                header.len()
            )));
        }
        let term = record.get(0).unwrap_or_default();
        let cells = (1..header.len())
            .map(|i| {
                let present = record.get(i).is_some_and(|v| !v.trim().is_empty());
                CellValue::Int(present as i64)
            })
            .collect();
        frame.push_row(term, cells);
    }
    debug!("Decoded {} DICX rows over {} categories", frame.len(), frame.categories.len());
    Ok(frame)
}

/// Reads a DICX file into an unvalidated frame.
pub fn read_dicx<P: AsRef<Path>>(path: P) -> Result<TableFrame> {
    let text = text_from_file(path, "utf-8")?;
    decode_dicx(&text)
}

/// Encodes a validated table as DICX bytes.
///
/// # Errors
///
/// Returns `InvalidParameter` if the marker is blank, since it would read
/// back as non-membership.
pub fn encode_dicx(table: &DictionaryTable, options: &DicxWriteOptions) -> Result<Vec<u8>> {
    if options.marker.is_whitespace() || options.marker.is_control() {
        return Err(DxError::invalid_parameter(format!("Invalid DICX marker: {:?}", options.marker)));
    }
    let marker = options.marker.to_string();

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(std::iter::once(TERM_AXIS).chain(table.categories().iter().map(|c| c.as_str())))?;
    for (term, flags) in table.rows() {
        let cells = flags.iter().map(|f| if *f == 1 { marker.as_str() } else { "" });
        writer.write_record(std::iter::once(term).chain(cells))?;
    }
    writer.into_inner().map_err(|e| DxError::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::validate;

    fn sample() -> DictionaryTable {
        validate(TableFrame::from_memberships(vec![
            ("happy", vec!["posemo"]),
            ("bittersweet", vec!["posemo", "negemo"]),
            ("sad, really", vec!["negemo"]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode_dicx(&sample(), &DicxWriteOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "DicTerm,negemo,posemo\nbittersweet,X,X\nhappy,,X\n\"sad, really\",X,\n"
        );
    }

    #[test]
    fn test_round_trip_is_exact() {
        let table = sample();
        let bytes = encode_dicx(&table, &DicxWriteOptions::default()).unwrap();
        let again = validate(decode_dicx(std::str::from_utf8(&bytes).unwrap()).unwrap()).unwrap();
        assert_eq!(table, again);
    }

    #[test]
    fn test_any_non_blank_marker_is_membership() {
        let frame = decode_dicx("DicTerm,a,b\nfoo,1,\nbar,yes, \nbaz,,*\n").unwrap();
        let table = validate(frame).unwrap();
        assert_eq!(table.get("foo", "a"), Some(1));
        assert_eq!(table.get("bar", "a"), Some(1));
        assert_eq!(table.get("bar", "b"), Some(0));
        assert_eq!(table.get("baz", "b"), Some(1));
    }

    #[test]
    fn test_short_rows_read_as_blank() {
        let frame = decode_dicx("DicTerm,a,b\nfoo,X\nbar,,X\n").unwrap();
        assert_eq!(frame.rows[0], vec![CellValue::Int(1), CellValue::Int(0)]);
    }

    #[test]
    fn test_long_rows_are_malformed() {
        let err = decode_dicx("DicTerm,a\nfoo,X,X\n").unwrap_err();
        assert!(err.is_malformed_format());
    }

    #[test]
    fn test_missing_term_column() {
        assert!(decode_dicx("Word,a\nfoo,X\n").unwrap_err().is_malformed_format());
        assert!(decode_dicx("a,DicTerm\nX,foo\n").unwrap_err().is_malformed_format());
        assert!(decode_dicx("").unwrap_err().is_malformed_format());
    }

    #[test]
    fn test_category_named_like_the_term_column() {
        let frame = decode_dicx("DicTerm,DicTerm,b\nfoo,X,\nbar,,X\n").unwrap();
        assert_eq!(frame.categories, ["DicTerm", "b"]);
        assert_eq!(frame.terms, ["foo", "bar"]);
        assert_eq!(frame.rows[0], vec![CellValue::Int(1), CellValue::Int(0)]);
    }

    #[test]
    fn test_custom_marker() {
        let options = DicxWriteOptions { marker: '✓' };
        let bytes = encode_dicx(&sample(), &options).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("happy,,✓\n"));
        assert_eq!(validate(decode_dicx(&text).unwrap()).unwrap(), sample());

        let blank = DicxWriteOptions { marker: ' ' };
        assert!(encode_dicx(&sample(), &blank).is_err());
    }
}
