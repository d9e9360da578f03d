//! Workbook exporter - triple tables, node listing and outcome comparison →
//! .xlsx worksheets

use crate::core::{ConversionReport, OutcomeComparison};
use crate::error::{GraphError, GraphResult};
use crate::types::{TripleTable, TRIPLE_COLUMNS};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

/// Worksheet holding the distinct node names
pub const NODES_SHEET: &str = "Nodes";

/// Worksheet holding the cross-rater outcome comparison
pub const OUTCOMES_SHEET: &str = "Outcome_Comparison";

/// Excel limit on worksheet name length
const MAX_SHEET_NAME: usize = 31;

/// Builds an .xlsx workbook one worksheet at a time
pub struct ExcelExporter {
    workbook: Workbook,
    sheet_names: Vec<String>,
    header: Format,
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcelExporter {
    /// Create a new exporter with an empty workbook
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            sheet_names: Vec::new(),
            header: Format::new().set_bold(),
        }
    }

    /// Names of the worksheets added so far, in order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// One sheet per rater, then `Total` and `Nodes`
    pub fn add_report(&mut self, report: &ConversionReport) -> GraphResult<()> {
        for table in &report.raters {
            self.add_triples(table)?;
        }
        self.add_triples(&report.total)?;
        self.add_nodes(&report.nodes)
    }

    /// Write a triple table to a sheet named after its label
    pub fn add_triples(&mut self, table: &TripleTable) -> GraphResult<()> {
        let header = self.header.clone();
        let worksheet = self.add_sheet(&table.label)?;

        for (col, title) in TRIPLE_COLUMNS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *title, &header)
                .map_err(export_err("header"))?;
        }

        for (idx, triple) in table.iter().enumerate() {
            let row = idx as u32 + 1;
            worksheet
                .write_string(row, 0, &triple.source)
                .map_err(export_err("source"))?;
            worksheet
                .write_string(row, 1, &triple.edge)
                .map_err(export_err("edge"))?;
            worksheet
                .write_string(row, 2, &triple.target)
                .map_err(export_err("target"))?;
            worksheet
                .write_number(row, 3, f64::from(triple.row_number))
                .map_err(export_err("row number"))?;
            worksheet
                .write_number(row, 4, f64::from(triple.sequence_number))
                .map_err(export_err("step"))?;
            worksheet
                .write_string(row, 5, &triple.rater_label)
                .map_err(export_err("rater label"))?;
        }
        Ok(())
    }

    /// Write the distinct node names to the `Nodes` sheet
    pub fn add_nodes(&mut self, nodes: &[String]) -> GraphResult<()> {
        let header = self.header.clone();
        let worksheet = self.add_sheet(NODES_SHEET)?;
        worksheet
            .write_string_with_format(0, 0, "Node", &header)
            .map_err(export_err("header"))?;
        for (idx, node) in nodes.iter().enumerate() {
            worksheet
                .write_string(idx as u32 + 1, 0, node)
                .map_err(export_err("node"))?;
        }
        Ok(())
    }

    /// Write the outcome comparison, one column of row numbers per rater
    pub fn add_outcomes(&mut self, comparison: &OutcomeComparison) -> GraphResult<()> {
        let header = self.header.clone();
        let worksheet = self.add_sheet(OUTCOMES_SHEET)?;

        let mut titles: Vec<&str> = TRIPLE_COLUMNS[..3].to_vec();
        titles.extend(comparison.raters.iter().map(String::as_str));
        titles.push("Count");
        for (col, title) in titles.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *title, &header)
                .map_err(export_err("header"))?;
        }

        let count_col = titles.len() as u16 - 1;
        for (idx, outcome) in comparison.rows.iter().enumerate() {
            let row = idx as u32 + 1;
            worksheet
                .write_string(row, 0, &outcome.source)
                .map_err(export_err("source"))?;
            worksheet
                .write_string(row, 1, &outcome.edge)
                .map_err(export_err("edge"))?;
            worksheet
                .write_string(row, 2, &outcome.target)
                .map_err(export_err("target"))?;
            for (offset, rows) in outcome.occurrences.iter().enumerate() {
                let joined = rows
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                worksheet
                    .write_string(row, 3 + offset as u16, &joined)
                    .map_err(export_err("occurrences"))?;
            }
            worksheet
                .write_number(row, count_col, outcome.count as f64)
                .map_err(export_err("count"))?;
        }
        Ok(())
    }

    /// Save the workbook
    pub fn save(mut self, path: &Path) -> GraphResult<()> {
        self.workbook.save(path).map_err(|e| {
            GraphError::Export(format!("Failed to save {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), sheets = self.sheet_names.len(), "saved workbook");
        Ok(())
    }

    fn add_sheet(&mut self, label: &str) -> GraphResult<&mut Worksheet> {
        let name = sanitize_sheet_name(label, &self.sheet_names);
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&name).map_err(|e| {
            GraphError::Export(format!("Failed to set worksheet name '{}': {}", name, e))
        })?;
        self.sheet_names.push(name);
        Ok(worksheet)
    }
}

fn export_err(what: &'static str) -> impl Fn(XlsxError) -> GraphError {
    move |e| GraphError::Export(format!("Failed to write {}: {}", what, e))
}

/// Make `label` a valid, unused worksheet name.
///
/// Drops `[]:*?/\`, trims apostrophes, truncates to 31 characters and
/// appends `_2`, `_3`, ... on case-insensitive clashes.
pub fn sanitize_sheet_name(label: &str, taken: &[String]) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim();
    let base = if cleaned.is_empty() { "Sheet" } else { cleaned };

    let is_taken = |candidate: &str| {
        taken
            .iter()
            .any(|name| name.to_lowercase() == candidate.to_lowercase())
    };

    let mut candidate: String = base.chars().take(MAX_SHEET_NAME).collect();
    let mut n = 2;
    while is_taken(&candidate) {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        candidate = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }
    candidate
}
