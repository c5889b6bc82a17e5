//! Read a single cell value

use std::path::Path;

use async_trait::async_trait;
use sb_core::tool::{decode_args, ParamSpec, Tool, ToolOutput};
use sb_core::{Error, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use umya_spreadsheet::Cell;

use crate::workbook::{self, CellRef};

#[derive(Debug, Clone, Deserialize)]
pub struct ReadCellRequest {
    pub filepath: String,
    pub sheet_name: String,
    pub cell: String,
}

/// Value of one cell; `null` when the cell is empty or was never written
pub fn read_cell(req: &ReadCellRequest) -> Result<ToolOutput> {
    let book = workbook::open(Path::new(&req.filepath))?;
    let sheet = book
        .get_sheet_by_name(&req.sheet_name)
        .ok_or_else(|| Error::SheetNotFound(req.sheet_name.clone()))?;
    let cell = CellRef::parse(&req.cell)?;

    tracing::debug!(sheet = %req.sheet_name, cell = %cell, "Reading cell");

    let value = sheet
        .get_cell(cell.coordinate())
        .map(cell_json)
        .unwrap_or(Value::Null);

    Ok(ToolOutput::value(value))
}

fn cell_json(cell: &Cell) -> Value {
    let raw = cell.get_value();
    if raw.is_empty() {
        return Value::Null;
    }

    match cell.get_data_type() {
        "n" => match raw.parse::<f64>() {
            Ok(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => json!(n as i64),
            Ok(n) => json!(n),
            Err(_) => json!(raw),
        },
        "b" => json!(raw.eq_ignore_ascii_case("true") || raw == "1"),
        _ => json!(raw),
    }
}

pub struct ReadCellTool;

#[async_trait]
impl Tool for ReadCellTool {
    fn name(&self) -> &str {
        "read_cell"
    }

    fn description(&self) -> &str {
        "Read a value from a specific cell."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("filepath", "Path to the .xlsx workbook"),
            ParamSpec::string("sheet_name", "Exact sheet name"),
            ParamSpec::string("cell", "Cell reference such as A1"),
        ]
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolOutput> {
        let req: ReadCellRequest = decode_args(self.name(), args)?;
        workbook::run_blocking(move || read_cell(&req)).await
    }
}
