//! I/O utility functions for dictionary files.
//!
//! This module provides helper functions for:
//! - Reading files and decoding text in a named encoding
//! - Stripping a UTF-8 byte order mark
//! - Suffix inspection and replacement on paths
//! - Atomic writes (temporary file + rename)
//!
//! # Examples
//!
//! ```no_run
//! use lexdx::utils::io_utils::{text_from_file, write_atomic};
//!
//! # fn main() -> lexdx::Result<()> {
//! let text = text_from_file("dictionary.dic", "utf-8")?;
//! write_atomic("copy.dic", text.as_bytes())?;
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use log::{debug, warn};

use crate::{DxError, Result};

/// Gets an encoding object by its label string.
///
/// # Arguments
///
/// * `label` - Encoding label (e.g., "utf-8", "utf-16", "latin1", "windows-1251")
///
/// # Errors
///
/// Returns an error if the encoding label is not recognized.
pub fn get_encoding_object_by_label(label: &str) -> Result<&'static Encoding> {
    let encoding = label.to_lowercase();
    let label = match encoding.as_str() {
        "utf-16" => "utf-16le",
        _ => encoding.as_str(),
    };
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding_obj) => Ok(encoding_obj),
        None => Err(DxError::invalid_parameter(format!("Invalid encoding: {}", encoding))),
    }
}

/// Strips a leading UTF-8 byte order mark.
pub fn skip_utf8_bom(text: &str) -> &str {
    // UTF-8 BOM is 0xEF 0xBB 0xBF which appears as \u{FEFF} in UTF-8
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

/// Decodes bytes to a string using the specified encoding.
///
/// Undecodable sequences are replaced and logged, not rejected.
pub fn decode_bytes_to_string(data: &[u8], encoding_obj: &'static Encoding) -> String {
    let (decoded, used, had_errors) = encoding_obj.decode(data);
    if had_errors {
        warn!("Decoding error with: {}", used.name());
    }
    skip_utf8_bom(&decoded).to_string()
}

/// Reads all bytes from a file path.
pub fn bytes_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Reads a text file in the given encoding.
pub fn text_from_file<P: AsRef<Path>>(path: P, encoding_label: &str) -> Result<String> {
    let encoding_obj = get_encoding_object_by_label(encoding_label)?;
    let data = bytes_from_file(path)?;
    Ok(decode_bytes_to_string(&data, encoding_obj))
}

/// Returns the suffix of a path including the leading dot (".dic"), or an
/// empty string when there is none.
pub fn path_suffix<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Replaces the suffix of a path, appending one if the path has none.
///
/// ```
/// use lexdx::utils::io_utils::with_suffix;
/// use std::path::PathBuf;
///
/// assert_eq!(with_suffix("cache/threat.txt", "dicx"), PathBuf::from("cache/threat.dicx"));
/// assert_eq!(with_suffix("cache/table.tar.gz", ".dicx"), PathBuf::from("cache/table.tar.dicx"));
/// assert_eq!(with_suffix("cache/words", "dicx"), PathBuf::from("cache/words.dicx"));
/// ```
pub fn with_suffix<P: AsRef<Path>>(path: P, new_suffix: &str) -> PathBuf {
    path.as_ref().with_extension(new_suffix.trim_start_matches('.'))
}

/// Writes `data` to `path` through a temporary sibling file and a rename, so
/// readers never observe a partially written file.
pub fn write_atomic<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .ok_or_else(|| DxError::invalid_parameter(format!("Invalid path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(format!(".{}.tmp", std::process::id()));
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| -> Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    debug!("Wrote {} bytes to {}", data.len(), path.display());
    result
}
