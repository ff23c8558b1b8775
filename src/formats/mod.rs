//! Dictionary file formats and the single read/write entry points.
//!
//! [`read_table`] and [`write_table`] pick the codec from the file suffix
//! (`.dic` or `.dicx`) and run schema validation on every table that comes out
//! of a file or goes into one. Other modules never call the codecs directly.
//!
//! # Examples
//!
//! ```no_run
//! use lexdx::formats::{read_table, write_table};
//!
//! # fn main() -> lexdx::Result<()> {
//! let table = read_table("honor.dic")?;
//! write_table(&table, "honor.dicx")?;
//! # Ok(())
//! # }
//! ```

pub mod dic_format;
pub mod dicx_format;

use std::path::Path;

use log::debug;

use crate::storage::dictionary_table::{DictionaryTable, TableFrame};
use crate::storage::schema::{check, validate};
use crate::utils::io_utils::{path_suffix, write_atomic};
use crate::{DxError, Result};

pub use dic_format::{DicReadOptions, EmptyRowPolicy};
pub use dicx_format::DicxWriteOptions;

/// Suffix of sparse DIC files.
pub const DIC_SUFFIX: &str = ".dic";
/// Suffix of dense DICX files.
pub const DICX_SUFFIX: &str = ".dicx";

/// A dictionary file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictFormat {
    Dic,
    Dicx,
}

impl DictFormat {
    /// Maps a suffix (with leading dot) to a format.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            DIC_SUFFIX => Some(DictFormat::Dic),
            DICX_SUFFIX => Some(DictFormat::Dicx),
            _ => None,
        }
    }

    /// Picks the format of a path by its suffix.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` naming the suffix if it is neither `.dic`
    /// nor `.dicx`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let suffix = path_suffix(path);
        Self::from_suffix(&suffix).ok_or_else(|| DxError::unsupported_format(suffix))
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DictFormat::Dic => DIC_SUFFIX,
            DictFormat::Dicx => DICX_SUFFIX,
        }
    }

    /// Decodes a file of this format without validating it.
    fn decode_file(&self, path: &Path, options: &ReadOptions) -> Result<TableFrame> {
        match self {
            DictFormat::Dic => dic_format::read_dic(path, &options.dic),
            DictFormat::Dicx => dicx_format::read_dicx(path),
        }
    }

    /// Encodes a validated table into this format.
    pub fn encode(&self, table: &DictionaryTable, options: &WriteOptions) -> Result<Vec<u8>> {
        match self {
            DictFormat::Dic => Ok(dic_format::encode_dic(table).into_bytes()),
            DictFormat::Dicx => dicx_format::encode_dicx(table, &options.dicx),
        }
    }
}

/// Options forwarded to the codec selected for reading.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub dic: DicReadOptions,
}

/// Options forwarded to the codec selected for writing.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub dicx: DicxWriteOptions,
}

/// Reads and validates a dictionary file, choosing the codec by suffix.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<DictionaryTable> {
    read_table_with_options(path, &ReadOptions::default())
}

/// Like [`read_table`] with explicit codec options.
pub fn read_table_with_options<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<DictionaryTable> {
    let path = path.as_ref();
    let format = DictFormat::from_path(path)?;
    debug!("Reading {:?} dictionary from {}", format, path.display());
    let frame = format.decode_file(path, options)?;
    validate(frame)
}

/// Writes a validated table, choosing the codec by suffix.
///
/// The file is replaced atomically; nothing is written if the table fails
/// its schema check.
pub fn write_table<P: AsRef<Path>>(table: &DictionaryTable, path: P) -> Result<()> {
    write_table_with_options(table, path, &WriteOptions::default())
}

/// Like [`write_table`] with explicit codec options.
pub fn write_table_with_options<P: AsRef<Path>>(
    table: &DictionaryTable,
    path: P,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let format = DictFormat::from_path(path)?;
    check(table)?;
    let data = format.encode(table, options)?;
    debug!("Writing {:?} dictionary ({} terms) to {}", format, table.len(), path.display());
    write_atomic(path, &data)
}

/// Validates a candidate frame and writes it, returning the validated table.
pub fn write_frame<P: AsRef<Path>>(frame: TableFrame, path: P) -> Result<DictionaryTable> {
    let path = path.as_ref();
    DictFormat::from_path(path)?;
    let table = validate(frame)?;
    write_table(&table, path)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::dictionary_table::CellValue;
    use tempfile::TempDir;

    fn sample() -> DictionaryTable {
        validate(TableFrame::from_memberships(vec![
            ("foo", vec!["A"]),
            ("bar", vec!["A", "B"]),
        ]))
        .unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DictFormat::from_path("x/y.dic").unwrap(), DictFormat::Dic);
        assert_eq!(DictFormat::from_path("x/y.dicx").unwrap(), DictFormat::Dicx);
        let err = DictFormat::from_path("x/y.txt").unwrap_err();
        match err {
            DxError::UnsupportedFormat { suffix, .. } => assert_eq!(suffix, ".txt"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(DictFormat::from_path("x/y.DIC").unwrap_err().is_unsupported_format());
    }

    #[test]
    fn test_read_txt_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "foo\n").unwrap();
        assert!(read_table(&path).unwrap_err().is_unsupported_format());
    }

    #[test]
    fn test_write_then_read_both_formats() {
        let dir = TempDir::new().unwrap();
        let table = sample();
        for name in ["d.dic", "d.dicx"] {
            let path = dir.path().join(name);
            write_table(&table, &path).unwrap();
            assert_eq!(read_table(&path).unwrap(), table, "{}", name);
        }
    }

    #[test]
    fn test_dic_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.dic");
        std::fs::write(&path, "%\n1\tA\n2\tB\n%\nfoo\t1\nbar\t1\t2\n").unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table, sample());
    }

    #[test]
    fn test_invalid_frame_is_never_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.dicx");
        let mut frame = TableFrame::new(vec!["threat".into()]);
        frame.push_row("sad", vec![CellValue::Int(0)]);
        let err = write_frame(frame, &path).unwrap_err();
        assert!(err.is_schema_error());
        assert!(!path.exists());
    }

    #[test]
    fn test_read_validates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dup.dicx");
        std::fs::write(&path, "DicTerm,a\nfoo,X\nFOO,X\n").unwrap();
        assert!(read_table(&path).unwrap_err().is_schema_error());
    }
}
