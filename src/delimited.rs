//! CSV input and output
//!
//! - adjacency CSVs (one file per rater, label = file stem)
//! - node reference CSVs
//! - triple tables and node listings written with the triple-sheet headings

use crate::core::NodeReferenceTable;
use crate::error::{GraphError, GraphResult};
use crate::types::{RaterTable, TripleTable};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Rater label derived from a file name
pub fn label_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read an adjacency CSV. Records may have different lengths.
pub fn read_rater_csv(path: &Path, has_header: bool) -> GraphResult<RaterTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_path(path)?;

    let mut table = RaterTable::new(label_from_path(path));
    for record in reader.records() {
        let record = record?;
        table.add_row(record.iter().map(str::to_string).collect());
    }
    table.pad_rows();
    info!(rater = %table.label, rows = table.row_count(), "imported rater csv");
    Ok(table)
}

/// Read a node reference CSV with a header row naming its columns
pub fn read_node_csv(path: &Path, name_column: &str, flag_column: &str) -> GraphResult<NodeReferenceTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let position = |column: &str| {
        headers.iter().position(|h| h.trim() == column).ok_or_else(|| {
            GraphError::Import(format!("{} has no column '{}'", path.display(), column))
        })
    };
    let name_idx = position(name_column)?;
    let flag_idx = position(flag_column)?;

    let mut nodes = NodeReferenceTable::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(name_idx).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        nodes.insert(name, record.get(flag_idx).unwrap_or(""));
    }
    Ok(nodes)
}

/// Write a triple table as CSV
pub fn write_triples_csv(path: &Path, table: &TripleTable) -> GraphResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for triple in table.iter() {
        writer.serialize(triple)?;
    }
    if table.is_empty() {
        writer.write_record(crate::types::TRIPLE_COLUMNS)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one `<label>.csv` per table into `dir`, creating it if needed
pub fn write_rater_csvs(dir: &Path, tables: &[TripleTable]) -> GraphResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(format!("{}.csv", file_safe(&table.label)));
        write_triples_csv(&path, table)?;
        info!(path = %path.display(), triples = table.len(), "wrote csv");
        written.push(path);
    }
    Ok(written)
}

/// Write the node listing as a single-column CSV
pub fn write_nodes_csv(path: &Path, nodes: &[String]) -> GraphResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Node"])?;
    for node in nodes {
        writer.write_record([node])?;
    }
    writer.flush()?;
    Ok(())
}

/// Replace path separators and other characters file systems reject
pub(crate) fn file_safe(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
