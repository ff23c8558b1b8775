//! Error types and result type for the lexdx crate.
//!
//! This module defines all error variants that can occur when reading, writing,
//! merging or fetching category dictionaries. It uses the `snafu` library for
//! ergonomic error handling with automatic backtrace capture.
//!
//! # Examples
//!
//! ```
//! use lexdx::{Result, DxError};
//!
//! fn open_dictionary() -> Result<String> {
//!     Err(DxError::unsupported_format(".txt"))
//! }
//!
//! match open_dictionary() {
//!     Ok(data) => println!("Success: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Error Variants
//!
//! - [`DxError::Schema`]: A table violates one of the dictionary invariants
//! - [`DxError::UnsupportedFormat`]: A file suffix maps to no codec
//! - [`DxError::UnknownCategory`]: A DIC body line references an undeclared id
//! - [`DxError::MalformedFormat`]: Sentinel or field layout violations
//! - [`DxError::Conversion`]: A raw converter failed or produced an invalid table
//! - [`DxError::AlreadyDerived`]: Attempt to derive a `.dicx` from a `.dicx`

use std::io;
use std::path::PathBuf;

use snafu::{Backtrace, Snafu};

use crate::storage::schema::Invariant;

// Re-export snafu for context providers
pub use snafu;

/// Main error type for the lexdx crate.
///
/// All errors include automatic backtrace capture for debugging purposes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DxError {
    /// I/O error occurred during file operations.
    #[snafu(display("IO error: {source}"))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },

    /// Error parsing CSV, JSON, or other structured data formats.
    #[snafu(display("Parser error: {source}"))]
    ParserError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        backtrace: Backtrace,
    },

    /// Function was called with invalid parameters.
    #[snafu(display("Invalid parameter: {message}"))]
    InvalidParameter {
        message: String,
        backtrace: Backtrace,
    },

    /// A dictionary table fails a schema invariant.
    #[snafu(display("Schema error ({invariant}): {message} [{}]", labels.join(", ")))]
    Schema {
        invariant: Invariant,
        labels: Vec<String>,
        message: String,
        backtrace: Backtrace,
    },

    /// File suffix is not a known dictionary format.
    #[snafu(display("Unsupported file extension: {suffix:?}"))]
    UnsupportedFormat {
        suffix: String,
        backtrace: Backtrace,
    },

    /// A DIC body line references a category id missing from the header.
    #[snafu(display("Unknown category id {id} for term {term:?} on line {line}"))]
    UnknownCategory {
        id: u32,
        term: String,
        line: usize,
        backtrace: Backtrace,
    },

    /// Dictionary file data doesn't match the expected layout.
    #[snafu(display("Malformed dictionary file: {message}"))]
    MalformedFormat {
        message: String,
        backtrace: Backtrace,
    },

    /// A raw converter failed, or its output failed validation.
    #[snafu(display("Conversion of {dictionary:?} failed: {source}"))]
    Conversion {
        dictionary: String,
        #[snafu(source(from(DxError, Box::new)))]
        source: Box<DxError>,
        backtrace: Backtrace,
    },

    /// The source artifact is already a derived `.dicx` file.
    #[snafu(display("File is already a DICX file, deriving would overwrite it: {}", path.display()))]
    AlreadyDerived {
        path: PathBuf,
        backtrace: Backtrace,
    },

    /// Dictionary name is absent from the registry.
    #[snafu(display("Unknown dictionary: {name}"))]
    UnknownDictionary {
        name: String,
        backtrace: Backtrace,
    },

    /// A raw artifact needs conversion but no converter is registered.
    #[snafu(display("No raw converter registered for dictionary {name:?}"))]
    MissingConverter {
        name: String,
        backtrace: Backtrace,
    },

    /// The external analysis application is not running.
    #[snafu(display("{app_name} is not running"))]
    AppNotRunning {
        app_name: String,
        backtrace: Backtrace,
    },
}

// For automatic conversions from standard error types
impl From<io::Error> for DxError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, backtrace: Backtrace::capture() }
    }
}

impl From<csv::Error> for DxError {
    fn from(source: csv::Error) -> Self {
        Self::ParserError { source: Box::new(source), backtrace: Backtrace::capture() }
    }
}

impl From<serde_json::Error> for DxError {
    fn from(source: serde_json::Error) -> Self {
        Self::ParserError { source: Box::new(source), backtrace: Backtrace::capture() }
    }
}

impl From<std::num::ParseIntError> for DxError {
    fn from(source: std::num::ParseIntError) -> Self {
        Self::ParserError { source: Box::new(source), backtrace: Backtrace::capture() }
    }
}

impl From<std::string::FromUtf8Error> for DxError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        Self::MalformedFormat {
            message: format!("Invalid UTF-8: {}", source),
            backtrace: Backtrace::capture(),
        }
    }
}

/// Helper methods for creating errors without context providers.
impl DxError {
    /// Creates an `InvalidParameter` error with the given message.
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `Schema` error for the violated invariant and offending labels.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexdx::DxError;
    /// use lexdx::storage::Invariant;
    ///
    /// let error = DxError::schema(Invariant::NonEmptyCategories, vec!["threat".into()], "category has no members");
    /// assert!(error.is_schema_error());
    /// ```
    pub fn schema<S: Into<String>>(invariant: Invariant, labels: Vec<String>, message: S) -> Self {
        Self::Schema {
            invariant,
            labels,
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `UnsupportedFormat` error naming the suffix.
    pub fn unsupported_format<S: Into<String>>(suffix: S) -> Self {
        Self::UnsupportedFormat {
            suffix: suffix.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `UnknownCategory` error.
    pub fn unknown_category<S: Into<String>>(id: u32, term: S, line: usize) -> Self {
        Self::UnknownCategory {
            id,
            term: term.into(),
            line,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `MalformedFormat` error with the given message.
    pub fn malformed_format<S: Into<String>>(message: S) -> Self {
        Self::MalformedFormat {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Wraps a converter failure for the named dictionary.
    pub fn conversion<S: Into<String>>(dictionary: S, source: DxError) -> Self {
        Self::Conversion {
            dictionary: dictionary.into(),
            source: Box::new(source),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn already_derived<P: Into<PathBuf>>(path: P) -> Self {
        Self::AlreadyDerived {
            path: path.into(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn unknown_dictionary<S: Into<String>>(name: S) -> Self {
        Self::UnknownDictionary {
            name: name.into(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn missing_converter<S: Into<String>>(name: S) -> Self {
        Self::MissingConverter {
            name: name.into(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn app_not_running<S: Into<String>>(app_name: S) -> Self {
        Self::AppNotRunning {
            app_name: app_name.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Checks if this error is a `Schema` variant.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, DxError::Schema { .. })
    }

    /// Returns the violated invariant for `Schema` errors.
    pub fn invariant(&self) -> Option<Invariant> {
        if let DxError::Schema { invariant, .. } = self {
            return Some(*invariant);
        }
        None
    }

    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, DxError::UnsupportedFormat { .. })
    }

    pub fn is_unknown_category(&self) -> bool {
        matches!(self, DxError::UnknownCategory { .. })
    }

    pub fn is_malformed_format(&self) -> bool {
        matches!(self, DxError::MalformedFormat { .. })
    }

    pub fn is_conversion_error(&self) -> bool {
        matches!(self, DxError::Conversion { .. })
    }

    pub fn is_already_derived(&self) -> bool {
        matches!(self, DxError::AlreadyDerived { .. })
    }
}

/// A specialized `Result` type for lexdx operations.
///
/// This is a convenience type alias that uses [`DxError`] as the error type.
pub type Result<T> = std::result::Result<T, DxError>;
