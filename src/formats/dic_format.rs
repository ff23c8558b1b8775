//! DIC codec: the sparse, line-oriented dictionary format.
//!
//! A DIC file has three sections separated by lines holding a single `%`:
//!
//! ```text
//! %
//! 1	posemo
//! 2	negemo
//! %
//! happy	1
//! bittersweet	1	2
//! ```
//!
//! Anything before the first sentinel is ignored. The middle section maps
//! positive integer ids to category names, one `<id><whitespace><name>` per
//! line. Each body line is a term, a tab, and the tab-separated ids of the
//! categories the term belongs to.
//!
//! Decoding produces an unvalidated [`TableFrame`]; callers go through
//! [`read_table`](crate::formats::read_table) to get a validated table.
//! Writing assigns ids 1..=n in the table's (sorted) column order, so the
//! original id assignment is not preserved across a read/write cycle.
//!
//! Header lines are written id first (`1\tposemo`), the only order the reader
//! accepts. Name-first headers (`posemo\t1`) fail with `MalformedFormat`.

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::storage::dictionary_table::{CellValue, DictionaryTable, TableFrame};
use crate::utils::io_utils::text_from_file;
use crate::{DxError, Result};

/// Section separator line.
pub const DIC_SENTINEL: &str = "%";

static CATEGORY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+)\s+(\S.*?)\s*$").unwrap());

/// What to do with a body line that lists no category ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmptyRowPolicy {
    /// Keep the term as a row with no memberships.
    #[default]
    Keep,
    /// Drop the line.
    Skip,
    /// Fail with a `MalformedFormat` error.
    Reject,
}

/// Options for reading DIC files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DicReadOptions {
    /// Text encoding label of the file (default "utf-8")
    pub encoding: String,
    /// Handling of terms without category ids
    pub empty_rows: EmptyRowPolicy,
}

impl Default for DicReadOptions {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            empty_rows: EmptyRowPolicy::Keep,
        }
    }
}

fn is_sentinel(line: &str) -> bool {
    line.trim() == DIC_SENTINEL
}

/// Parses the category header section into an id → column catalog.
fn parse_category_catalog<'a, I>(lines: I) -> Result<(IndexMap<u32, usize>, Vec<String>)>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut catalog = IndexMap::<u32, usize>::new();
    let mut names = Vec::<String>::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let caps = CATEGORY_LINE.captures(line.trim()).ok_or_else(|| {
            DxError::malformed_format(format!("line {}: expected \"<id>\\t<category>\", got {:?}", line_no, line))
        })?;
        let id = parse_category_id(&caps[1], line_no)?;
        if catalog.contains_key(&id) {
            return Err(DxError::malformed_format(format!("line {}: duplicate category id {}", line_no, id)));
        }
        catalog.insert(id, names.len());
        names.push(caps[2].to_string());
    }
    Ok((catalog, names))
}

fn parse_category_id(field: &str, line_no: usize) -> Result<u32> {
    match field.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DxError::malformed_format(format!(
            "line {}: category id must be a positive integer, got {:?}",
            line_no, field
        ))),
    }
}

/// Decodes DIC text into an unvalidated frame.
///
/// # Errors
///
/// - `MalformedFormat` if there are not exactly two sentinel lines, a header
///   line is not `<id> <name>`, an id is not a positive integer, or an empty
///   row is met under [`EmptyRowPolicy::Reject`]
/// - `UnknownCategory` if a body line references an id absent from the header
///
/// # Examples
///
/// ```
/// use lexdx::formats::dic_format::{decode_dic, DicReadOptions};
///
/// # fn main() -> lexdx::Result<()> {
/// let frame = decode_dic("%\n1\tA\n2\tB\n%\nfoo\t1\nbar\t1\t2\n", &DicReadOptions::default())?;
/// assert_eq!(frame.categories, ["A", "B"]);
/// assert_eq!(frame.terms, ["foo", "bar"]);
/// # Ok(())
/// # }
/// ```
pub fn decode_dic(text: &str, options: &DicReadOptions) -> Result<TableFrame> {
    let lines: Vec<(usize, &str)> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .collect();

    let sentinels: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, (_, line))| is_sentinel(line))
        .map(|(pos, _)| pos)
        .collect();
    if sentinels.len() != 2 {
        return Err(DxError::malformed_format(format!(
            "expected exactly two '{}' section lines, found {}",
            DIC_SENTINEL,
            sentinels.len()
        )));
    }
    let (first, second) = (sentinels[0], sentinels[1]);
    if lines[..first].iter().any(|(_, line)| !line.trim().is_empty()) {
        debug!("Ignoring {} preamble lines before the category header", first);
    }

    let (catalog, categories) = parse_category_catalog(lines[first + 1..second].iter().copied())?;
    debug!("DIC header declares {} categories", categories.len());

    let mut frame = TableFrame::new(categories);
    for &(line_no, line) in &lines[second + 1..] {
        if line.trim().is_empty() {
            continue;
        }
        let (term, ids) = line.split_once('\t').unwrap_or((line, ""));
        let term = term.trim();
        if term.is_empty() {
            return Err(DxError::malformed_format(format!("line {}: missing term", line_no)));
        }

        let mut cells = vec![CellValue::Int(0); frame.categories.len()];
        let mut listed = 0usize;
        for field in ids.split_whitespace() {
            let id = parse_category_id(field, line_no)?;
            let column = *catalog
                .get(&id)
                .ok_or_else(|| DxError::unknown_category(id, term, line_no))?;
            cells[column] = CellValue::Int(1);
            listed += 1;
        }

        if listed == 0 {
            match options.empty_rows {
                EmptyRowPolicy::Keep => {}
                EmptyRowPolicy::Skip => {
                    warn!("line {}: dropping term {:?} with no categories", line_no, term);
                    continue;
                }
                EmptyRowPolicy::Reject => {
                    return Err(DxError::malformed_format(format!(
                        "line {}: term {:?} lists no categories",
                        line_no, term
                    )));
                }
            }
        }
        frame.push_row(term, cells);
    }
    debug!("Decoded {} DIC rows", frame.len());
    Ok(frame)
}

/// Reads a DIC file into an unvalidated frame.
pub fn read_dic<P: AsRef<Path>>(path: P, options: &DicReadOptions) -> Result<TableFrame> {
    let text = text_from_file(path, &options.encoding)?;
    decode_dic(&text, options)
}

/// Encodes a validated table as DIC text.
///
/// Categories get ids 1..=n in column order; each body line lists the ids of
/// the term's categories in ascending order.
pub fn encode_dic(table: &DictionaryTable) -> String {
    let mut out = String::new();
    out.push_str(DIC_SENTINEL);
    out.push('\n');
    for (i, category) in table.categories().iter().enumerate() {
        out.push_str(&format!("{}\t{}\n", i + 1, category));
    }
    out.push_str(DIC_SENTINEL);
    out.push('\n');
    for (term, flags) in table.rows() {
        out.push_str(term);
        for (i, flag) in flags.iter().enumerate() {
            if *flag == 1 {
                out.push_str(&format!("\t{}", i + 1));
            }
        }
        out.push('\n');
    }
    out
}
