//! Fill a column with a run of consecutive integers

use std::path::Path;

use async_trait::async_trait;
use sb_core::tool::{decode_args, ParamSpec, Tool, ToolOutput};
use sb_core::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::workbook::{self, CellRef, MAX_ROW};

#[derive(Debug, Clone, Deserialize)]
pub struct InsertRangeRequest {
    pub filepath: String,
    pub sheet_name: String,
    pub start_cell: String,
    pub start_value: Value,
    pub end_value: Value,
}

/// Largest magnitude a bound may have; cells store `f64`, which holds every
/// integer up to 2^53 exactly
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Integer bound from a JSON number or an integer string; fractional numbers
/// are truncated
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Write `start_value..=end_value` downwards from `start_cell`
///
/// A bad start cell, bad bounds or a sheet name clashing by case with an
/// existing sheet come back as an `{error}` result and the file is not
/// touched. An empty range (start above end) writes nothing but still saves.
pub fn insert_range(req: &InsertRangeRequest) -> Result<ToolOutput> {
    let (Some(origin), Some(letters)) = (
        CellRef::parse_prefix(&req.start_cell),
        workbook::column_prefix(&req.start_cell),
    ) else {
        return Ok(ToolOutput::error(format!(
            "Invalid start_cell format: '{}'. Must be like 'A2' or 'B5'.",
            req.start_cell
        )));
    };

    let start_text = workbook::scalar_text(&req.start_value);
    let end_text = workbook::scalar_text(&req.end_value);
    let (start, end) = match (as_integer(&req.start_value), as_integer(&req.end_value)) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            return Ok(ToolOutput::error(format!(
                "Start value and end value must be integers. Got: start_value={}, end_value={}",
                start_text, end_text
            )));
        }
    };
    if start.unsigned_abs() > MAX_EXACT_INTEGER || end.unsigned_abs() > MAX_EXACT_INTEGER {
        return Ok(ToolOutput::error(format!(
            "Start value and end value must be between -{limit} and {limit}. Got: start_value={}, end_value={}",
            start_text,
            end_text,
            limit = MAX_EXACT_INTEGER
        )));
    }

    let count = if end >= start { end.abs_diff(start).saturating_add(1) } else { 0 };
    let last_row = (origin.row as u64).saturating_add(count.saturating_sub(1));
    if count > 0 && last_row > MAX_ROW as u64 {
        return Ok(ToolOutput::error(format!(
            "Range of {} values starting at {} runs past the last row ({}).",
            count, req.start_cell, MAX_ROW
        )));
    }

    let path = Path::new(&req.filepath);
    let mut book = workbook::open(path)?;

    match workbook::find_sheet_ignore_case(&book, &req.sheet_name) {
        Some(existing) if existing != req.sheet_name => {
            return Ok(ToolOutput::error(format!(
                "Sheet '{}' clashes with existing sheet '{}'.",
                req.sheet_name, existing
            )));
        }
        Some(_) => {}
        None => {
            tracing::info!(sheet = %req.sheet_name, "Creating missing sheet");
            workbook::add_sheet(&mut book, &req.sheet_name)?;
        }
    }
    let sheet = book
        .get_sheet_by_name_mut(&req.sheet_name)
        .ok_or_else(|| sb_core::Error::SheetNotFound(req.sheet_name.clone()))?;

    for (offset, value) in (start..=end).enumerate() {
        let row = origin.row + offset as u32;
        sheet
            .get_cell_mut((origin.column, row))
            .set_value_number(value as f64);
    }

    workbook::save(&book, path)?;

    tracing::debug!(count, column = %origin.column_letters(), "Inserted range");

    Ok(ToolOutput::message(format!(
        "Inserted values {} to {} in column {} starting at {}.",
        start, end, letters, req.start_cell
    )))
}

pub struct InsertRangeTool;

#[async_trait]
impl Tool for InsertRangeTool {
    fn name(&self) -> &str {
        "insert_range_in_column"
    }

    fn description(&self) -> &str {
        "Insert a range of integer values into a column starting at a specific cell."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("filepath", "Path to the .xlsx workbook"),
            ParamSpec::string("sheet_name", "Sheet to fill; created when missing"),
            ParamSpec::string("start_cell", "First cell to write, e.g. B3"),
            ParamSpec::integer("start_value", "First integer of the range"),
            ParamSpec::integer("end_value", "Last integer of the range, inclusive"),
        ]
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolOutput> {
        let req: InsertRangeRequest = decode_args(self.name(), args)?;
        workbook::run_blocking(move || insert_range(&req)).await
    }
}
