//! sb-tools: Spreadsheet tools for SheetBridge
//!
//! Each tool opens the workbook named by its `filepath` argument, performs
//! one operation, and writes the file back when it changed anything.

use sb_core::ToolRegistry;

pub mod create_sheet;
pub mod delete_sheet;
pub mod insert_range;
pub mod list_sheets;
pub mod read_cell;
pub mod save_file;
pub mod workbook;
pub mod write_cell;

pub use create_sheet::CreateSheetTool;
pub use delete_sheet::DeleteSheetTool;
pub use insert_range::InsertRangeTool;
pub use list_sheets::ListSheetsTool;
pub use read_cell::ReadCellTool;
pub use save_file::SaveFileTool;
pub use write_cell::WriteCellTool;

use std::sync::Arc;

/// Register all spreadsheet tools with the registry
pub fn register_default_tools(registry: &mut ToolRegistry) {
    registry.register(Arc::new(ListSheetsTool));
    registry.register(Arc::new(ReadCellTool));
    registry.register(Arc::new(WriteCellTool));
    registry.register(Arc::new(InsertRangeTool));
    registry.register(Arc::new(CreateSheetTool));
    registry.register(Arc::new(DeleteSheetTool));
    registry.register(Arc::new(SaveFileTool));
}
