//! Raw converters turn third-party dictionary releases into tables.
//!
//! Each dictionary whose upstream artifact is not already DIC or DICX has a
//! converter registered under its name. A converter reads the raw file in
//! whatever layout the publisher chose and returns an unvalidated
//! [`TableFrame`]; the fetch pipeline validates and persists the result.
//!
//! # Examples
//!
//! ```
//! use lexdx::builder::{ConverterRegistry, RawConverter};
//! use lexdx::storage::TableFrame;
//! use std::path::Path;
//!
//! let mut converters = ConverterRegistry::builtin();
//! converters.register("colors", |path: &Path| -> lexdx::Result<TableFrame> {
//!     let text = std::fs::read_to_string(path)?;
//!     Ok(TableFrame::from_term_list("colors", text.lines()))
//! });
//! assert!(converters.get("colors").is_some());
//! assert!(converters.get("sleep").is_some());
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use crate::storage::dictionary_table::TableFrame;
use crate::utils::io_utils::text_from_file;
use crate::Result;

/// Common interface for converting a raw artifact into a candidate table.
pub trait RawConverter {
    /// Reads the raw file at `raw_path` and returns an unvalidated frame.
    fn convert(&self, raw_path: &Path) -> Result<TableFrame>;
}

impl<F> RawConverter for F
where
    F: Fn(&Path) -> Result<TableFrame>,
{
    fn convert(&self, raw_path: &Path) -> Result<TableFrame> {
        self(raw_path)
    }
}

/// Dictionary name → converter lookup table, built once at startup.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: BTreeMap<String, Box<dyn RawConverter>>,
}

impl ConverterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the converters shipped with this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("sleep", read_raw_sleep);
        registry.register("threat", read_raw_threat);
        registry
    }

    /// Registers (or replaces) the converter for `name`.
    pub fn register<C: RawConverter + 'static>(&mut self, name: &str, converter: C) {
        self.converters.insert(name.to_string(), Box::new(converter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn RawConverter> {
        self.converters.get(name).map(|c| c.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(|k| k.as_str())
    }
}

// Terms that were autocorrected in the published table. The first comes from
// the paper's supplementary Table S1, the others follow the same pattern.
const SLEEP_CORRECTIONS: [(&str, &str); 3] = [
    ("can't sleep", "cant sleep"),
    ("couldn't sleep", "couldnt sleep"),
    ("didn't sleep", "didnt sleep"),
];

/// Converts the sleep-disturbance word table (Ladis et al., 2023).
///
/// The raw file is tab-separated with one title line. Every non-blank cell,
/// read row by row, is a term of the single `sleep` category.
pub fn read_raw_sleep(raw_path: &Path) -> Result<TableFrame> {
    let text = text_from_file(raw_path, "utf-8")?;
    let words: Vec<String> = text
        .lines()
        .skip(1)
        .flat_map(|line| line.split('\t'))
        .map(|cell| cell.trim().to_lowercase())
        .filter(|cell| !cell.is_empty())
        .map(|word| {
            SLEEP_CORRECTIONS
                .iter()
                .find(|(from, _)| *from == word)
                .map(|(_, to)| to.to_string())
                .unwrap_or(word)
        })
        .collect();
    debug!("sleep: {} terms", words.len());
    Ok(TableFrame::from_term_list("sleep", words))
}

/// Converts the threat dictionary (Choi et al., 2022), a plain word list.
pub fn read_raw_threat(raw_path: &Path) -> Result<TableFrame> {
    let text = text_from_file(raw_path, "utf-8")?;
    let words: Vec<&str> = text.lines().map(str::trim).filter(|w| !w.is_empty()).collect();
    debug!("threat: {} terms", words.len());
    Ok(TableFrame::from_term_list("threat", words))
}
