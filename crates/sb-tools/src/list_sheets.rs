//! List sheet names

use std::path::Path;

use async_trait::async_trait;
use sb_core::tool::{decode_args, ParamSpec, Tool, ToolOutput};
use sb_core::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::workbook;

#[derive(Debug, Clone, Deserialize)]
pub struct ListSheetsRequest {
    pub filepath: String,
}

/// Sheet names of the workbook, in order
pub fn list_sheets(req: &ListSheetsRequest) -> Result<ToolOutput> {
    let book = workbook::open(Path::new(&req.filepath))?;
    Ok(ToolOutput::sheets(workbook::sheet_names(&book)))
}

pub struct ListSheetsTool;

#[async_trait]
impl Tool for ListSheetsTool {
    fn name(&self) -> &str {
        "list_sheets"
    }

    fn description(&self) -> &str {
        "List all sheet names in an Excel file."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::string("filepath", "Path to the .xlsx workbook")]
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolOutput> {
        let req: ListSheetsRequest = decode_args(self.name(), args)?;
        workbook::run_blocking(move || list_sheets(&req)).await
    }
}
