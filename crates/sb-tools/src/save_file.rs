//! Save acknowledgement
//!
//! Every mutating tool already persists its change, so this only confirms.

use async_trait::async_trait;
use sb_core::tool::{decode_args, ParamSpec, Tool, ToolOutput};
use sb_core::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct SaveFileRequest {
    pub filepath: String,
}

pub fn save_file(req: &SaveFileRequest) -> ToolOutput {
    ToolOutput::message(format!("File '{}' saved.", req.filepath))
}

pub struct SaveFileTool;

#[async_trait]
impl Tool for SaveFileTool {
    fn name(&self) -> &str {
        "save_file"
    }

    fn description(&self) -> &str {
        "Save the Excel file."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::string("filepath", "Path to the .xlsx workbook")]
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolOutput> {
        let req: SaveFileRequest = decode_args(self.name(), args)?;
        Ok(save_file(&req))
    }
}
