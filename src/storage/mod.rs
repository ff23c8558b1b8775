// In-memory dictionary tables and the schema they must satisfy
//
// This module provides the candidate and validated table types and the
// validator that turns one into the other.

pub mod dictionary_table;
pub mod schema;

pub use dictionary_table::{CellValue, DictionaryTable, TableFrame, TERM_AXIS, CATEGORY_AXIS};
pub use schema::{Invariant, validate, check};
