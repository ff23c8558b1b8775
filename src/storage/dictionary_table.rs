//! In-memory dictionary tables.
//!
//! A dictionary is a term × category membership matrix. Two shapes exist:
//!
//! - [`TableFrame`]: a candidate table as produced by a codec, a raw converter
//!   or the merge engine. Its cells are loosely typed ([`CellValue`]) and no
//!   invariant is guaranteed.
//! - [`DictionaryTable`]: a table that has passed
//!   [`validate`](crate::storage::schema::validate). Both axes are sorted,
//!   labels are unique, every cell is 0 or 1 and every category has at least
//!   one member. It can only be obtained through validation and is never
//!   mutated afterwards.
//!
//! # Examples
//!
//! ```
//! use lexdx::storage::{TableFrame, CellValue, validate};
//!
//! # fn main() -> lexdx::Result<()> {
//! let mut frame = TableFrame::new(vec!["A".to_string(), "B".to_string()]);
//! frame.push_row("foo", vec![CellValue::Int(1), CellValue::Int(0)]);
//! frame.push_row("bar", vec![CellValue::Int(1), CellValue::Int(1)]);
//!
//! let table = validate(frame)?;
//! assert_eq!(table.terms(), ["bar", "foo"]);
//! assert_eq!(table.get("foo", "B"), Some(0));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;

/// Name of the row (term) axis, also the first DICX header field.
pub const TERM_AXIS: &str = "DicTerm";

/// Name of the column (category) axis. Kept as metadata only.
pub const CATEGORY_AXIS: &str = "Category";

/// A loosely typed cell of a candidate table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl CellValue {
    /// Coerces the cell to a membership flag, if it denotes 0 or 1.
    pub fn as_flag(&self) -> Option<u8> {
        match self {
            CellValue::Int(0) => Some(0),
            CellValue::Int(1) => Some(1),
            CellValue::Int(_) => None,
            CellValue::Float(f) if *f == 0.0 => Some(0),
            CellValue::Float(f) if *f == 1.0 => Some(1),
            CellValue::Float(_) => None,
            CellValue::Bool(b) => Some(*b as u8),
            CellValue::Text(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    CellValue::Int(i).as_flag()
                } else if let Ok(f) = s.parse::<f64>() {
                    CellValue::Float(f).as_flag()
                } else {
                    None
                }
            }
            CellValue::Missing => None,
        }
    }
}

impl From<u8> for CellValue {
    fn from(value: u8) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// A candidate dictionary table that has not been validated yet.
///
/// Rows are kept in insertion order and duplicates are allowed; the schema
/// validator decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFrame {
    /// Row labels
    pub terms: Vec<String>,
    /// Column labels
    pub categories: Vec<String>,
    /// One row of cells per term, nominally `categories.len()` wide
    pub rows: Vec<Vec<CellValue>>,
}

impl TableFrame {
    /// Creates an empty frame over the given categories.
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            terms: Vec::new(),
            categories,
            rows: Vec::new(),
        }
    }

    /// Appends a row. The width is checked at validation time.
    pub fn push_row<S: Into<String>>(&mut self, term: S, cells: Vec<CellValue>) {
        self.terms.push(term.into());
        self.rows.push(cells);
    }

    /// Builds a one-category frame where every listed term is a member.
    ///
    /// Duplicate terms are kept as separate rows.
    pub fn from_term_list<S, I>(category: &str, terms: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let mut frame = Self::new(vec![category.to_string()]);
        for term in terms {
            frame.push_row(term, vec![CellValue::Int(1)]);
        }
        frame
    }

    /// Builds a frame from `(term, member categories)` pairs.
    ///
    /// The column set is the union of all categories mentioned, in order of
    /// first appearance.
    pub fn from_memberships<T, C, I>(rows: I) -> Self
    where
        T: Into<String>,
        C: AsRef<str>,
        I: IntoIterator<Item = (T, Vec<C>)>,
    {
        let rows: Vec<(String, Vec<C>)> = rows.into_iter().map(|(t, c)| (t.into(), c)).collect();
        let mut categories = indexmap::IndexSet::<String>::new();
        for (_, cats) in &rows {
            for cat in cats {
                categories.insert(cat.as_ref().to_string());
            }
        }
        let mut frame = Self::new(categories.iter().cloned().collect());
        for (term, cats) in rows {
            let members: BTreeSet<&str> = cats.iter().map(|c| c.as_ref()).collect();
            let cells = categories
                .iter()
                .map(|c| CellValue::Int(members.contains(c.as_str()) as i64))
                .collect();
            frame.push_row(term, cells);
        }
        frame
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A validated dictionary table.
///
/// Constructed only by the schema validator; both axes are sorted and every
/// invariant holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryTable {
    terms: Vec<String>,
    categories: Vec<String>,
    // row-major, terms.len() * categories.len()
    cells: Vec<u8>,
}

impl DictionaryTable {
    pub(crate) fn from_sorted_parts(terms: Vec<String>, categories: Vec<String>, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), terms.len() * categories.len());
        Self { terms, categories, cells }
    }

    /// Sorted row labels.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Sorted column labels.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn num_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn term_position(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }

    pub fn category_position(&self, category: &str) -> Option<usize> {
        self.categories.binary_search_by(|c| c.as_str().cmp(category)).ok()
    }

    /// Membership flag of `term` in `category`, `None` if either is unknown.
    pub fn get(&self, term: &str, category: &str) -> Option<u8> {
        let row = self.term_position(term)?;
        let col = self.category_position(category)?;
        Some(self.cells[row * self.categories.len() + col])
    }

    /// The membership flags of the row at `index`, in column order.
    pub fn row(&self, index: usize) -> &[u8] {
        let width = self.categories.len();
        &self.cells[index * width..(index + 1) * width]
    }

    /// Iterates `(term, flags)` in sorted term order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        self.terms
            .iter()
            .enumerate()
            .map(move |(i, term)| (term.as_str(), self.row(i)))
    }

    /// Categories `term` belongs to, in column order.
    pub fn categories_of(&self, term: &str) -> Option<Vec<&str>> {
        let row = self.term_position(term)?;
        Some(
            self.row(row)
                .iter()
                .zip(&self.categories)
                .filter(|(flag, _)| **flag == 1)
                .map(|(_, c)| c.as_str())
                .collect(),
        )
    }

    /// Terms that are members of `category`, in row order.
    pub fn members_of(&self, category: &str) -> Option<Vec<&str>> {
        let col = self.category_position(category)?;
        Some(
            self.rows()
                .filter(|(_, flags)| flags[col] == 1)
                .map(|(term, _)| term)
                .collect(),
        )
    }

    /// Converts back into a candidate frame, e.g. to feed the merge engine.
    pub fn into_frame(self) -> TableFrame {
        let width = self.categories.len();
        let rows = if width == 0 {
            vec![Vec::new(); self.terms.len()]
        } else {
            self.cells
                .chunks(width)
                .map(|chunk| chunk.iter().map(|v| CellValue::Int(*v as i64)).collect())
                .collect()
        };
        TableFrame {
            terms: self.terms,
            categories: self.categories,
            rows,
        }
    }
}
