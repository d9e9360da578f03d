//! Workbook import/export
//!
//! - Import: adjacency worksheets → rater tables, node reference sheet,
//!   previously written triple sheets
//! - Export: rater triple sheets, `Total`, `Nodes`, `Outcome_Comparison`

mod exporter;
mod importer;

pub use exporter::{sanitize_sheet_name, ExcelExporter, NODES_SHEET, OUTCOMES_SHEET};
pub use importer::ExcelImporter;
