//! Dictionary merging.
//!
//! [`merge_tables`] is an outer join on both axes: the result holds every term
//! and every category of every input. A cell is 1 when any input marks the
//! term as a member of the category, and 0 otherwise, including pairs that no
//! input mentions. Inputs sharing a category name are unioned into one column.
//!
//! The result is validated like any other table, so it is sorted and equal to
//! what a DICX write/read cycle of the same content returns. Merging is
//! commutative and associative.

use std::collections::{BTreeMap, BTreeSet};

use log::info;

use crate::storage::dictionary_table::{CellValue, DictionaryTable, TableFrame};
use crate::storage::schema::validate;
use crate::{DxError, Result};

/// Merges validated tables into one.
///
/// # Errors
///
/// Returns `InvalidParameter` for an empty input, and `Schema` if the union
/// fails validation (only possible when an input already violated an
/// invariant).
///
/// # Examples
///
/// ```
/// use lexdx::builder::merge_tables;
/// use lexdx::storage::{TableFrame, validate};
///
/// # fn main() -> lexdx::Result<()> {
/// let a = validate(TableFrame::from_term_list("threat", ["war"]))?;
/// let b = validate(TableFrame::from_term_list("sleep", ["insomnia"]))?;
/// let merged = merge_tables(&[a, b])?;
/// assert_eq!(merged.categories(), ["sleep", "threat"]);
/// assert_eq!(merged.get("war", "sleep"), Some(0));
/// # Ok(())
/// # }
/// ```
pub fn merge_tables(tables: &[DictionaryTable]) -> Result<DictionaryTable> {
    if tables.is_empty() {
        return Err(DxError::invalid_parameter("No dictionaries to merge"));
    }

    let categories: Vec<String> = tables
        .iter()
        .flat_map(|t| t.categories().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column_of: BTreeMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut rows = BTreeMap::<&str, Vec<bool>>::new();
    for table in tables {
        let columns: Vec<usize> = table.categories().iter().map(|c| column_of[c.as_str()]).collect();
        for (term, flags) in table.rows() {
            let row = rows.entry(term).or_insert_with(|| vec![false; categories.len()]);
            for (flag, &col) in flags.iter().zip(&columns) {
                row[col] |= *flag == 1;
            }
        }
    }

    let mut frame = TableFrame::new(categories.clone());
    for (term, row) in rows {
        frame.push_row(term, row.into_iter().map(CellValue::Bool).collect());
    }
    info!("Merged {} dictionaries into {} terms x {} categories", tables.len(), frame.len(), categories.len());
    validate(frame)
}
