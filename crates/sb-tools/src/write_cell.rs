//! Write a single cell, creating the sheet when it does not exist

use std::path::Path;

use async_trait::async_trait;
use sb_core::tool::{decode_args, ParamSpec, Tool, ToolOutput};
use sb_core::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use umya_spreadsheet::Spreadsheet;

use crate::workbook::{self, CellRef};

#[derive(Debug, Clone, Deserialize)]
pub struct WriteCellRequest {
    pub filepath: String,
    pub sheet_name: String,
    pub cell: String,
    pub value: Value,
}

/// Find an existing sheet ignoring case and surrounding whitespace.
/// When several sheets collide the last one wins.
pub fn match_sheet_name(book: &Spreadsheet, requested: &str) -> Option<String> {
    let wanted = requested.trim().to_lowercase();
    workbook::sheet_names(book)
        .into_iter()
        .filter(|name| name.trim().to_lowercase() == wanted)
        .last()
}

pub fn write_cell(req: &WriteCellRequest) -> Result<ToolOutput> {
    let path = Path::new(&req.filepath);
    let cell = CellRef::parse(&req.cell)?;
    let mut book = workbook::open(path)?;

    let sheet = match match_sheet_name(&book, &req.sheet_name) {
        Some(existing) => book
            .get_sheet_by_name_mut(&existing)
            .ok_or_else(|| Error::SheetNotFound(existing.clone()))?,
        None => {
            tracing::info!(sheet = %req.sheet_name, "Creating missing sheet");
            workbook::add_sheet(&mut book, &req.sheet_name)?
        }
    };

    let target = sheet.get_cell_mut(cell.coordinate());
    match &req.value {
        Value::String(s) => {
            target.set_value_string(s.as_str());
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                target.set_value_number(f);
            }
            None => {
                target.set_value_string(n.to_string());
            }
        },
        Value::Bool(b) => {
            target.set_value_bool(*b);
        }
        other => {
            return Err(Error::InvalidArguments(format!(
                "write_cell: value must be a string, number or boolean, got {}",
                other
            )));
        }
    }

    workbook::save(&book, path)?;

    Ok(ToolOutput::message(format!(
        "Value '{}' written to {}:{}",
        workbook::scalar_text(&req.value),
        req.sheet_name,
        req.cell
    )))
}

pub struct WriteCellTool;

#[async_trait]
impl Tool for WriteCellTool {
    fn name(&self) -> &str {
        "write_cell"
    }

    fn description(&self) -> &str {
        "Write a value to a specific cell. Create sheet if missing. Handle spaces, cases safely."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("filepath", "Path to the .xlsx workbook"),
            ParamSpec::string("sheet_name", "Sheet name; matched ignoring case and spaces"),
            ParamSpec::string("cell", "Cell reference such as A1"),
            ParamSpec::scalar("value", "Value to store"),
        ]
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolOutput> {
        let req: WriteCellRequest = decode_args(self.name(), args)?;
        workbook::run_blocking(move || write_cell(&req)).await
    }
}
