//! Workbook file access shared by the spreadsheet tools
//!
//! Every operation opens the file fresh and, when it mutates, writes the
//! whole document back. Nothing is cached between calls.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use sb_core::{Error, Result};
use serde_json::Value as JsonValue;
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// Largest column index in an xlsx sheet (`XFD`)
pub const MAX_COLUMN: u32 = 16_384;
/// Largest row index in an xlsx sheet
pub const MAX_ROW: u32 = 1_048_576;

static STRICT_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?([A-Za-z]{1,3})\$?([0-9]+)$").expect("valid regex"));

static CELL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)").expect("valid regex"));

/// Load a workbook from disk
pub fn open(path: &Path) -> Result<Spreadsheet> {
    if !path.exists() {
        return Err(Error::WorkbookNotFound(path.display().to_string()));
    }

    tracing::debug!(path = %path.display(), "Opening workbook");
    umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| Error::Spreadsheet(format!("failed to read '{}': {}", path.display(), e)))
}

/// Write the whole workbook back to disk
pub fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "Saving workbook");
    umya_spreadsheet::writer::xlsx::write(book, path)
        .map_err(|e| Error::Spreadsheet(format!("failed to write '{}': {}", path.display(), e)))
}

/// Create a blank workbook with the library's default sheet, replacing any
/// existing file
pub fn create_blank_workbook(path: &Path) -> Result<()> {
    let book = umya_spreadsheet::new_file();
    save(&book, path)
}

/// Sheet names in workbook order
pub fn sheet_names(book: &Spreadsheet) -> Vec<String> {
    book.get_sheet_collection()
        .iter()
        .map(|ws| ws.get_name().to_string())
        .collect()
}

/// Existing sheet whose name equals `name` ignoring letter case.
/// xlsx sheet names must be unique under this comparison.
pub fn find_sheet_ignore_case(book: &Spreadsheet, name: &str) -> Option<String> {
    let wanted = name.to_lowercase();
    sheet_names(book)
        .into_iter()
        .find(|existing| existing.to_lowercase() == wanted)
}

/// Add a sheet. Refuses a name that clashes with an existing sheet
/// ignoring case; callers check with [`find_sheet_ignore_case`] first when
/// they want to report the clash as an `{error}` result.
pub fn add_sheet<'a>(book: &'a mut Spreadsheet, name: &str) -> Result<&'a mut Worksheet> {
    if let Some(existing) = find_sheet_ignore_case(book, name) {
        return Err(Error::Spreadsheet(format!(
            "cannot create sheet '{}': clashes with existing sheet '{}'",
            name, existing
        )));
    }

    book.new_sheet(name)
        .map_err(|e| Error::Spreadsheet(format!("cannot create sheet '{}': {}", name, e)))
}

/// Run blocking workbook I/O on the blocking thread pool
pub async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(format!("workbook task failed: {}", e)))?
}

/// Text form of a scalar argument, as it appears in result messages
pub fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A single-cell A1 reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

impl CellRef {
    /// Parse a complete reference such as `B7` or `$B$7`
    pub fn parse(input: &str) -> Result<Self> {
        let caps = STRICT_CELL
            .captures(input.trim())
            .ok_or_else(|| Error::InvalidCell(input.to_string()))?;

        Self::from_parts(&caps[1], &caps[2]).ok_or_else(|| Error::InvalidCell(input.to_string()))
    }

    /// Parse the leading `<letters><digits>` of `input`, ignoring anything
    /// after the digits. Returns `None` if the prefix is missing or out of
    /// sheet bounds.
    pub fn parse_prefix(input: &str) -> Option<Self> {
        let caps = CELL_PREFIX.captures(input.trim())?;
        Self::from_parts(&caps[1], &caps[2])
    }

    fn from_parts(letters: &str, digits: &str) -> Option<Self> {
        let column = column_index(letters)?;
        let row: u32 = digits.parse().ok()?;
        if row == 0 || row > MAX_ROW {
            return None;
        }
        Some(Self { column, row })
    }

    /// `(column, row)` as the spreadsheet library addresses cells
    pub fn coordinate(&self) -> (u32, u32) {
        (self.column, self.row)
    }

    /// Column letters, e.g. `AB`
    pub fn column_letters(&self) -> String {
        column_letters(self.column)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}

/// Column letters of a `<letters><digits>` prefix exactly as typed
pub fn column_prefix(input: &str) -> Option<&str> {
    CELL_PREFIX
        .captures(input.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 1-based column index for letters (`A` = 1, `AA` = 27)
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut index: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
        if index > MAX_COLUMN {
            return None;
        }
    }
    Some(index)
}

/// Column letters for a 1-based index
pub fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}
