//! Workbook importer - worksheets → rater tables, node reference table,
//! triple tables

use crate::core::NodeReferenceTable;
use crate::error::{GraphError, GraphResult};
use crate::types::{RaterTable, Triple, TripleTable, TRIPLE_COLUMNS};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads adjacency sheets (and their companions) from .xlsx/.xls/.ods files
pub struct ExcelImporter {
    path: PathBuf,
    has_header: bool,
}

impl ExcelImporter {
    /// Create a new importer; the first row of every sheet is a header by default
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            has_header: true,
        }
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    fn open(&self) -> GraphResult<Sheets<BufReader<File>>> {
        open_workbook_auto(&self.path).map_err(|e| {
            GraphError::Import(format!(
                "Failed to open workbook {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn range(&self, workbook: &mut Sheets<BufReader<File>>, sheet: &str) -> GraphResult<Range<Data>> {
        workbook.worksheet_range(sheet).map_err(|e| {
            GraphError::Import(format!("Failed to read worksheet '{}': {}", sheet, e))
        })
    }

    /// All worksheet titles in workbook order
    pub fn sheet_names(&self) -> GraphResult<Vec<String>> {
        Ok(self.open()?.sheet_names().to_vec())
    }

    /// Read the adjacency sheets of the given raters.
    ///
    /// With no raters listed, every sheet not named in `skip` is read.
    pub fn import_raters(&self, raters: &[String], skip: &[&str]) -> GraphResult<Vec<RaterTable>> {
        let mut workbook = self.open()?;
        let names: Vec<String> = if raters.is_empty() {
            workbook
                .sheet_names()
                .iter()
                .filter(|name| !skip.contains(&name.as_str()))
                .cloned()
                .collect()
        } else {
            raters.to_vec()
        };

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let range = self.range(&mut workbook, &name)?;
            let table = self.rater_table(&name, &range);
            info!(rater = %name, rows = table.row_count(), width = table.width(), "imported rater sheet");
            tables.push(table);
        }
        Ok(tables)
    }

    /// Read one adjacency sheet
    pub fn import_sheet(&self, sheet: &str) -> GraphResult<RaterTable> {
        let mut workbook = self.open()?;
        let range = self.range(&mut workbook, sheet)?;
        Ok(self.rater_table(sheet, &range))
    }

    fn rater_table(&self, label: &str, range: &Range<Data>) -> RaterTable {
        // ranges start at the first used cell; row numbers count from A1
        let (first_row, first_col) = range.start().unwrap_or((0, 0));
        let leading = std::iter::repeat_with(Vec::<String>::new).take(first_row as usize);
        let used = range.rows().map(|row| {
            std::iter::repeat(String::new())
                .take(first_col as usize)
                .chain(row.iter().map(cell_text))
                .collect::<Vec<String>>()
        });

        let mut table = RaterTable::new(label);
        for row in leading.chain(used).skip(usize::from(self.has_header)) {
            table.add_row(row);
        }
        table.pad_rows();
        table
    }

    /// Read the node reference sheet. Columns are located by header text.
    pub fn import_node_table(
        &self,
        sheet: &str,
        name_column: &str,
        flag_column: &str,
    ) -> GraphResult<NodeReferenceTable> {
        let mut workbook = self.open()?;
        let range = self.range(&mut workbook, sheet)?;
        let mut rows = range.rows();

        let header: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        let name_idx = column_index(&header, name_column, sheet)?;
        let flag_idx = column_index(&header, flag_column, sheet)?;

        let mut nodes = NodeReferenceTable::new();
        for row in rows {
            let name = row.get(name_idx).map(cell_text).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let flag = row.get(flag_idx).map(flag_text).unwrap_or_default();
            nodes.insert(name, &flag);
        }

        info!(
            sheet,
            nodes = nodes.len(),
            of_interest = nodes.interesting_count(),
            "imported node reference table"
        );
        Ok(nodes)
    }

    /// Read a triple sheet written by the exporter (e.g. `Total`)
    pub fn import_triples(&self, sheet: &str) -> GraphResult<TripleTable> {
        let mut workbook = self.open()?;
        let range = self.range(&mut workbook, sheet)?;
        let mut rows = range.rows();

        let header: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default();
        let mut idx = [0usize; 6];
        for (slot, column) in idx.iter_mut().zip(TRIPLE_COLUMNS) {
            *slot = column_index(&header, column, sheet)?;
        }

        let mut table = TripleTable::new(sheet);
        for (line, row) in rows.enumerate() {
            let text = |i: usize| row.get(idx[i]).map(cell_text).unwrap_or_default();
            let number = |i: usize| -> GraphResult<u32> {
                let value = text(i);
                value.parse::<u32>().map_err(|_| {
                    GraphError::Import(format!(
                        "Sheet '{}' row {}: '{}' is not a valid {}",
                        sheet,
                        line + 2,
                        value,
                        TRIPLE_COLUMNS[i]
                    ))
                })
            };
            if text(0).is_empty() && text(1).is_empty() && text(2).is_empty() {
                continue;
            }
            table.push(Triple {
                source: text(0),
                edge: text(1),
                target: text(2),
                row_number: number(3)?,
                sequence_number: number(4)?,
                rater_label: text(5),
            });
        }
        debug!(sheet, triples = table.len(), "imported triple sheet");
        Ok(table)
    }
}

fn column_index(header: &[String], column: &str, sheet: &str) -> GraphResult<usize> {
    header.iter().position(|h| h.trim() == column).ok_or_else(|| {
        GraphError::Import(format!("Sheet '{}' has no column '{}'", sheet, column))
    })
}

/// Render a cell as the text a sheet user sees
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Flag cells: boolean `false` reads as unset
fn flag_text(cell: &Data) -> String {
    match cell {
        Data::Bool(false) => String::new(),
        other => cell_text(other),
    }
}
