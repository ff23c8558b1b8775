//! # lexdx - Category Dictionary Reader, Writer and Fetcher
//!
//! This crate manages the dictionaries used for dictionary-based text
//! categorization: every term belongs to one or more named categories. It
//! reads and writes the two common file formats, enforces a strict schema on
//! every table that crosses a file boundary, merges dictionaries and fetches
//! published dictionaries into a local cache.
//!
//! ## Features
//!
//! - **DIC**: sparse `%`-sectioned format (category ids in a header, one line per term)
//! - **DICX**: dense comma-separated format (one column per category)
//! - **Schema validation**: lowercase unique terms, unique categories, 0/1 cells,
//!   no empty categories
//! - **Merging**: outer join of any number of dictionaries
//! - **Fetch pipeline**: download-or-reuse of raw artifacts with one-time
//!   conversion to DICX through pluggable converters
//!
//! ## Quick Start
//!
//! ### Converting a DIC file to DICX
//!
//! ```no_run
//! use lexdx::{read_table, write_table};
//!
//! # fn main() -> lexdx::Result<()> {
//! let table = read_table("Honor-Dictionary-English_2017.dic")?;
//! println!("{} terms in {} categories", table.len(), table.num_categories());
//! write_table(&table, "honor.dicx")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Merging dictionaries
//!
//! ```
//! use lexdx::builder::merge_tables;
//! use lexdx::storage::{TableFrame, validate};
//!
//! # fn main() -> lexdx::Result<()> {
//! let a = validate(TableFrame::from_memberships(vec![("war", vec!["threat"])]))?;
//! let b = validate(TableFrame::from_memberships(vec![("insomnia", vec!["sleep"])]))?;
//! let merged = merge_tables(&[a, b])?;
//! assert_eq!(merged.terms(), ["insomnia", "war"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Tables**: [`storage`] for candidate/validated tables and the schema
//! - **Formats**: [`formats`] for the DIC and DICX codecs and the suffix dispatcher
//! - **Builders**: [`builder`] for merging and raw converters
//! - **Fetching**: [`fetch`] for the registry, content fetchers and pipeline
//! - **External tools**: [`external`] for the analysis application's CLI
//! - **Utilities**: [`utils`] for I/O helpers
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T>`] type, where errors are
//! represented by [`DxError`]. The crate uses the `snafu` library for error
//! handling with context and backtraces.

pub mod builder;
pub mod error;
pub mod external;
pub mod fetch;
pub mod formats;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use formats::{DictFormat, read_table, write_table};
pub use storage::{DictionaryTable, TableFrame, validate};

// Re-export error types for convenience
pub use error::{DxError, Result, snafu};
