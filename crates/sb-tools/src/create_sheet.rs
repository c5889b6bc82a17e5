//! Create a sheet, creating the workbook file when it does not exist

use std::path::Path;

use async_trait::async_trait;
use sb_core::tool::{decode_args, ParamSpec, Tool, ToolOutput};
use sb_core::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::workbook;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSheetRequest {
    pub filepath: String,
    pub sheet_name: String,
}

pub fn create_sheet(req: &CreateSheetRequest) -> Result<ToolOutput> {
    let path = Path::new(&req.filepath);

    // A fresh file holds only the requested sheet.
    let mut book = if path.exists() {
        workbook::open(path)?
    } else {
        tracing::info!(path = %path.display(), "Creating new workbook");
        umya_spreadsheet::new_file_empty_worksheet()
    };

    if let Some(existing) = workbook::find_sheet_ignore_case(&book, &req.sheet_name) {
        let text = if existing == req.sheet_name {
            format!("Sheet '{}' already exists.", existing)
        } else {
            format!("Sheet '{}' already exists as '{}'.", req.sheet_name, existing)
        };
        return Ok(ToolOutput::error(text));
    }

    workbook::add_sheet(&mut book, &req.sheet_name)?;
    workbook::save(&book, path)?;

    Ok(ToolOutput::message(format!(
        "Sheet '{}' created in '{}'.",
        req.sheet_name, req.filepath
    )))
}

pub struct CreateSheetTool;

#[async_trait]
impl Tool for CreateSheetTool {
    fn name(&self) -> &str {
        "create_sheet"
    }

    fn description(&self) -> &str {
        "Create a new sheet in the Excel file."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("filepath", "Path to the .xlsx workbook"),
            ParamSpec::string("sheet_name", "Name of the new sheet"),
        ]
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolOutput> {
        let req: CreateSheetRequest = decode_args(self.name(), args)?;
        workbook::run_blocking(move || create_sheet(&req)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::workbook_with;
    use std::fs;
    use tempfile::TempDir;

    fn request(path: &str, sheet: &str) -> CreateSheetRequest {
        CreateSheetRequest {
            filepath: path.to_string(),
            sheet_name: sheet.to_string(),
        }
    }

    #[test]
    fn test_create_sheet_in_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.xlsx").to_string_lossy().into_owned();

        let output = create_sheet(&request(&path, "Finance")).unwrap();
        assert_eq!(
            output,
            ToolOutput::message(format!("Sheet 'Finance' created in '{}'.", path))
        );

        let book = workbook::open(Path::new(&path)).unwrap();
        assert_eq!(workbook::sheet_names(&book), vec!["Finance".to_string()]);
    }

    #[test]
    fn test_create_sheet_appends() {
        let dir = TempDir::new().unwrap();
        let path = workbook_with(&dir, &["One"]);

        create_sheet(&request(&path, "Two")).unwrap();

        let book = workbook::open(Path::new(&path)).unwrap();
        assert_eq!(
            workbook::sheet_names(&book),
            vec!["One".to_string(), "Two".to_string()]
        );
    }

    #[test]
    fn test_create_duplicate_sheet() {
        let dir = TempDir::new().unwrap();
        let path = workbook_with(&dir, &["One"]);
        let before = fs::read(&path).unwrap();

        let output = create_sheet(&request(&path, "One")).unwrap();
        assert_eq!(output, ToolOutput::error("Sheet 'One' already exists."));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_create_sheet_differing_only_in_case() {
        let dir = TempDir::new().unwrap();
        let path = workbook_with(&dir, &["Finance"]);
        let before = fs::read(&path).unwrap();

        let output = create_sheet(&request(&path, "FINANCE")).unwrap();
        assert_eq!(
            output,
            ToolOutput::error("Sheet 'FINANCE' already exists as 'Finance'.")
        );
        assert_eq!(fs::read(&path).unwrap(), before);

        let book = workbook::open(Path::new(&path)).unwrap();
        assert_eq!(workbook::sheet_names(&book), vec!["Finance".to_string()]);
    }
}
