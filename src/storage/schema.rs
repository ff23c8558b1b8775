//! Dictionary table schema.
//!
//! [`validate`] is the single gate every table passes before it is handed to a
//! caller or written to disk. It normalizes a [`TableFrame`] (lowercases terms,
//! coerces cells, sorts both axes) and checks the invariants:
//!
//! - **I1** every category has at least one member
//! - **I2** terms are unique, non-empty and lowercase
//! - **I3** category labels are unique and non-empty
//! - **I4** the table is strict: rows match the declared columns, at least
//!   one category exists, and every cell is coercible to 0 or 1
//!
//! Labels may not contain tab or line-break characters, nor start or end with
//! whitespace, since the DIC reader trims fields and splits on tabs. A term
//! may not be a bare `%`, which is the DIC section line.
//!
//! Terms are lowercased rather than checked for case, so a term without
//! cased characters (`"123"`, `":)"`) is valid.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use log::debug;

use crate::formats::dic_format::DIC_SENTINEL;
use crate::storage::dictionary_table::{DictionaryTable, TableFrame};
use crate::{DxError, Result};

/// The dictionary invariants a table can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invariant {
    /// I1: every category has at least one member.
    NonEmptyCategories,
    /// I2: terms are unique, non-empty and lowercase.
    TermLabels,
    /// I3: category labels are unique and non-empty.
    CategoryLabels,
    /// I4: no stray rows or columns, every cell is 0 or 1.
    Strict,
}

impl Invariant {
    pub fn code(&self) -> &'static str {
        match self {
            Invariant::NonEmptyCategories => "I1",
            Invariant::TermLabels => "I2",
            Invariant::CategoryLabels => "I3",
            Invariant::Strict => "I4",
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Invariant::NonEmptyCategories => "every category has at least one member",
            Invariant::TermLabels => "terms are unique, non-empty and lowercase",
            Invariant::CategoryLabels => "category labels are unique and non-empty",
            Invariant::Strict => "cells are 0 or 1 over the declared axes",
        };
        write!(f, "{}: {}", self.code(), text)
    }
}

fn has_forbidden_chars(label: &str) -> bool {
    label.contains(['\t', '\r', '\n'])
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with(char::is_whitespace)
        && !label.ends_with(char::is_whitespace)
        && !has_forbidden_chars(label)
}

fn is_valid_term(term: &str) -> bool {
    is_valid_label(term) && term != DIC_SENTINEL
}

fn check_categories(categories: &[String]) -> Result<()> {
    if categories.is_empty() {
        return Err(DxError::schema(Invariant::Strict, Vec::new(), "table declares no categories"));
    }
    let bad: Vec<String> = categories
        .iter()
        .filter(|c| !is_valid_label(c))
        .cloned()
        .collect();
    if !bad.is_empty() {
        return Err(DxError::schema(Invariant::CategoryLabels, bad, "invalid category label"));
    }
    let mut seen = HashSet::with_capacity(categories.len());
    let mut duplicates: Vec<String> = categories
        .iter()
        .filter(|c| !seen.insert(c.as_str()))
        .cloned()
        .collect();
    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(DxError::schema(Invariant::CategoryLabels, duplicates, "duplicate category label"));
    }
    Ok(())
}

/// Validates and normalizes a candidate table.
///
/// # Arguments
///
/// * `frame` - The candidate table
///
/// # Returns
///
/// The validated table, sorted by term and by category.
///
/// # Errors
///
/// Returns [`DxError::Schema`] naming the violated [`Invariant`] and the
/// offending labels when the frame cannot be coerced into a valid table.
///
/// # Examples
///
/// ```
/// use lexdx::storage::{TableFrame, Invariant, validate};
///
/// let mut frame = TableFrame::new(vec!["threat".to_string()]);
/// frame.push_row("sad", vec![0u8.into()]);
/// let err = validate(frame).unwrap_err();
/// assert_eq!(err.invariant(), Some(Invariant::NonEmptyCategories));
/// ```
pub fn validate(frame: TableFrame) -> Result<DictionaryTable> {
    let TableFrame { terms, categories, rows } = frame;
    check_categories(&categories)?;
    let width = categories.len();

    if terms.len() != rows.len() {
        return Err(DxError::schema(
            Invariant::Strict,
            Vec::new(),
            format!("{} terms but {} rows", terms.len(), rows.len()),
        ));
    }

    // lowercased term -> coerced flags
    let mut sorted_rows = BTreeMap::<String, Vec<u8>>::new();
    let mut duplicates = Vec::new();
    for (term, cells) in terms.into_iter().zip(rows) {
        let term = term.to_lowercase();
        if !is_valid_term(&term) {
            return Err(DxError::schema(Invariant::TermLabels, vec![term], "invalid term label"));
        }
        if cells.len() != width {
            return Err(DxError::schema(
                Invariant::Strict,
                vec![term],
                format!("row has {} cells, expected {}", cells.len(), width),
            ));
        }
        let mut flags = Vec::with_capacity(width);
        for (cell, category) in cells.iter().zip(&categories) {
            match cell.as_flag() {
                Some(flag) => flags.push(flag),
                None => {
                    return Err(DxError::schema(
                        Invariant::Strict,
                        vec![format!("{}/{}", term, category)],
                        format!("cell {:?} is not 0 or 1", cell),
                    ));
                }
            }
        }
        if sorted_rows.contains_key(&term) {
            duplicates.push(term);
            continue;
        }
        sorted_rows.insert(term, flags);
    }
    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(DxError::schema(Invariant::TermLabels, duplicates, "duplicate term"));
    }

    let mut column_order: Vec<usize> = (0..width).collect();
    column_order.sort_by(|a, b| categories[*a].cmp(&categories[*b]));

    let mut counts = vec![0usize; width];
    let mut cells = Vec::with_capacity(sorted_rows.len() * width);
    for flags in sorted_rows.values() {
        for (out_col, &in_col) in column_order.iter().enumerate() {
            let flag = flags[in_col];
            counts[out_col] += flag as usize;
            cells.push(flag);
        }
    }
    let sorted_categories: Vec<String> = column_order.iter().map(|&i| categories[i].clone()).collect();

    let empty: Vec<String> = sorted_categories
        .iter()
        .zip(&counts)
        .filter(|(_, count)| **count == 0)
        .map(|(c, _)| c.clone())
        .collect();
    if !empty.is_empty() {
        return Err(DxError::schema(Invariant::NonEmptyCategories, empty, "category has no members"));
    }

    debug!("Validated table: {} terms x {} categories", sorted_rows.len(), width);
    Ok(DictionaryTable::from_sorted_parts(
        sorted_rows.into_keys().collect(),
        sorted_categories,
        cells,
    ))
}

/// Re-checks an already validated table.
///
/// Tables are immutable, so this only re-reads the structural invariants at write
/// boundaries that accept tables from the outside.
pub fn check(table: &DictionaryTable) -> Result<()> {
    check_categories(table.categories())?;
    let bad: Vec<String> = table.terms().iter().filter(|t| !is_valid_term(t)).cloned().collect();
    if !bad.is_empty() {
        return Err(DxError::schema(Invariant::TermLabels, bad, "invalid term label"));
    }
    let sorted = table.terms().windows(2).all(|w| w[0] < w[1]);
    if !sorted {
        return Err(DxError::schema(Invariant::TermLabels, Vec::new(), "terms are not sorted and unique"));
    }
    for (col, category) in table.categories().iter().enumerate() {
        if !table.rows().any(|(_, flags)| flags[col] == 1) {
            return Err(DxError::schema(Invariant::NonEmptyCategories, vec![category.clone()], "category has no members"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::dictionary_table::CellValue;

    fn frame(categories: &[&str], rows: &[(&str, &[i64])]) -> TableFrame {
        let mut frame = TableFrame::new(categories.iter().map(|c| c.to_string()).collect());
        for (term, cells) in rows {
            frame.push_row(*term, cells.iter().map(|v| CellValue::Int(*v)).collect());
        }
        frame
    }

    #[test]
    fn test_sorts_both_axes() {
        let table = validate(frame(&["b", "a"], &[("zoo", &[1, 0]), ("ant", &[0, 1])])).unwrap();
        assert_eq!(table.terms(), ["ant", "zoo"]);
        assert_eq!(table.categories(), ["a", "b"]);
        assert_eq!(table.get("ant", "a"), Some(1));
        assert_eq!(table.get("zoo", "b"), Some(1));
        assert_eq!(table.get("zoo", "a"), Some(0));
    }

    #[test]
    fn test_all_zero_category_is_rejected() {
        let err = validate(frame(&["threat"], &[("sad", &[0])])).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::NonEmptyCategories));
        match err {
            DxError::Schema { labels, .. } => assert_eq!(labels, ["threat"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_terms_are_lowercased_and_deduplicated() {
        let table = validate(frame(&["a"], &[("Hello", &[1])])).unwrap();
        assert_eq!(table.terms(), ["hello"]);

        let err = validate(frame(&["a"], &[("Hello", &[1]), ("hello", &[1])])).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::TermLabels));
    }

    #[test]
    fn test_empty_term_is_rejected() {
        let err = validate(frame(&["a"], &[("", &[1])])).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::TermLabels));
    }

    #[test]
    fn test_duplicate_category_is_rejected() {
        let err = validate(frame(&["a", "a"], &[("x", &[1, 1])])).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::CategoryLabels));
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let mut f = TableFrame::new(vec!["a".into()]);
        f.push_row("x", vec![CellValue::Text("yes".into())]);
        let err = validate(f).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::Strict));

        let err = validate(frame(&["a"], &[("x", &[2])])).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::Strict));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let err = validate(frame(&["a", "b"], &[("x", &[1])])).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::Strict));
    }

    #[test]
    fn test_no_categories_is_rejected() {
        let err = validate(TableFrame::default()).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::Strict));
    }

    #[test]
    fn test_tab_in_label_is_rejected() {
        let err = validate(frame(&["a\tb"], &[("x", &[1])])).unwrap_err();
        assert_eq!(err.invariant(), Some(Invariant::CategoryLabels));
    }

    #[test]
    fn test_labels_the_dic_reader_would_alter_are_rejected() {
        for term in [" war", "war ", "war\u{a0}", "%"] {
            let err = validate(frame(&["a"], &[("x", &[1]), (term, &[1])])).unwrap_err();
            assert_eq!(err.invariant(), Some(Invariant::TermLabels), "{:?}", term);
        }
        for category in ["A ", " A"] {
            let err = validate(frame(&[category], &[("x", &[1])])).unwrap_err();
            assert_eq!(err.invariant(), Some(Invariant::CategoryLabels), "{:?}", category);
        }
    }

    #[test]
    fn test_awkward_but_valid_labels() {
        let table = validate(frame(
            &["neg emo", "%", "DicTerm"],
            &[("can't  sleep", &[1, 0, 0]), ("100%", &[0, 1, 0]), ("123", &[0, 0, 1])],
        ))
        .unwrap();
        assert_eq!(table.terms(), ["100%", "123", "can't  sleep"]);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let table = validate(frame(&["b", "a"], &[("zoo", &[1, 1]), ("ant", &[0, 1])])).unwrap();
        let again = validate(table.clone().into_frame()).unwrap();
        assert_eq!(table, again);
        check(&again).unwrap();
    }
}
