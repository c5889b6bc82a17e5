//! Delete a sheet by exact name

use std::path::Path;

use async_trait::async_trait;
use sb_core::tool::{decode_args, ParamSpec, Tool, ToolOutput};
use sb_core::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::workbook;

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteSheetRequest {
    pub filepath: String,
    pub sheet_name: String,
}

/// Remove the sheet and persist. Missing sheets and the last remaining
/// sheet are reported as `{error}` without writing.
pub fn delete_sheet(req: &DeleteSheetRequest) -> Result<ToolOutput> {
    let path = Path::new(&req.filepath);
    let mut book = workbook::open(path)?;

    if book.get_sheet_by_name(&req.sheet_name).is_none() {
        return Ok(ToolOutput::error(format!(
            "Sheet '{}' not found.",
            req.sheet_name
        )));
    }

    if book.get_sheet_collection().len() == 1 {
        return Ok(ToolOutput::error(format!(
            "Sheet '{}' is the only sheet and cannot be deleted.",
            req.sheet_name
        )));
    }

    book.remove_sheet_by_name(&req.sheet_name).map_err(|e| {
        Error::Spreadsheet(format!("cannot delete sheet '{}': {}", req.sheet_name, e))
    })?;
    workbook::save(&book, path)?;

    Ok(ToolOutput::message(format!(
        "Sheet '{}' deleted.",
        req.sheet_name
    )))
}

pub struct DeleteSheetTool;

#[async_trait]
impl Tool for DeleteSheetTool {
    fn name(&self) -> &str {
        "delete_sheet"
    }

    fn description(&self) -> &str {
        "Delete a sheet from the Excel file."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("filepath", "Path to the .xlsx workbook"),
            ParamSpec::string("sheet_name", "Exact name of the sheet to delete"),
        ]
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolOutput> {
        let req: DeleteSheetRequest = decode_args(self.name(), args)?;
        workbook::run_blocking(move || delete_sheet(&req)).await
    }
}
