//! Workbook import/export tests
//!
//! Fixtures are written with rust_xlsxwriter into temp dirs, read back with
//! the importer and pushed through a full conversion session.

use medreview_graph::config::{NodeSourceConfig, SessionConfig};
use medreview_graph::core::{compare_outcomes, NodeFilter, TOTAL_LABEL};
use medreview_graph::excel::{ExcelExporter, ExcelImporter, NODES_SHEET, OUTCOMES_SHEET};
use medreview_graph::session::Session;
use medreview_graph::types::{ConversionMode, TRIPLE_COLUMNS};
use medreview_graph::GraphError;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: [&str; 5] = ["Source", "Edge", "Target", "Edge", "Target"];

/// Adjacency workbook with two raters and a node reference sheet
fn write_adjacency_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let raters: [(&str, &[[&str; 5]]); 2] = [
        (
            "Pharmacist_1",
            &[
                ["Take History", "needs", "Lab Values", "informs", "Physician"],
                ["", "", "", "", ""],
                ["Check Dose", "needsRequestOf", "Physician", "", ""],
            ],
        ),
        (
            "Pharmacist_2",
            &[["Take History", "reviews", "Chart", "needs", "Lab Values"]],
        ),
    ];
    for (name, rows) in raters {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).unwrap();
        for (col, title) in HEADER.iter().enumerate() {
            sheet.write_string(0, col as u16, *title).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    sheet.write_string(r as u32 + 1, c as u16, *cell).unwrap();
                }
            }
        }
    }

    let nodes = workbook.add_worksheet();
    nodes.set_name("Nodes").unwrap();
    nodes.write_string(0, 0, "Name").unwrap();
    nodes.write_string(0, 1, "node_of_interest").unwrap();
    let flags: [(&str, Option<bool>); 5] = [
        ("TakeHistory", Some(true)),
        ("LabValues", Some(true)),
        ("Physician", Some(true)),
        ("Chart", Some(false)),
        ("CheckDose", None),
    ];
    for (r, (name, flag)) in flags.iter().enumerate() {
        nodes.write_string(r as u32 + 1, 0, *name).unwrap();
        if let Some(flag) = flag {
            nodes.write_boolean(r as u32 + 1, 1, *flag).unwrap();
        }
    }

    workbook.save(path).unwrap();
}

fn fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("adjacency.xlsx");
    write_adjacency_workbook(&path);
    (dir, path)
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORTER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_raters_skips_node_sheet() {
    let (_dir, path) = fixture();
    let importer = ExcelImporter::new(&path);
    assert_eq!(
        importer.sheet_names().unwrap(),
        vec!["Pharmacist_1", "Pharmacist_2", "Nodes"]
    );

    let tables = importer.import_raters(&[], &[NODES_SHEET]).unwrap();
    let labels: Vec<&str> = tables.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["Pharmacist_1", "Pharmacist_2"]);

    let first = &tables[0];
    assert_eq!(first.row_count(), 3);
    assert_eq!(first.rows[1], vec!["", "", "", "", ""]);
    assert_eq!(first.rows[2], vec!["Check Dose", "needsRequestOf", "Physician", "", ""]);
}

#[test]
fn test_import_without_header_keeps_first_row() {
    let (_dir, path) = fixture();
    let table = ExcelImporter::new(&path)
        .with_header(false)
        .import_sheet("Pharmacist_2")
        .unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0][0], "Source");
}

#[test]
fn test_import_selected_rater() {
    let (_dir, path) = fixture();
    let tables = ExcelImporter::new(&path)
        .import_raters(&["Pharmacist_2".to_string()], &[])
        .unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].label, "Pharmacist_2");
}

#[test]
fn test_import_unknown_sheet() {
    let (_dir, path) = fixture();
    let result = ExcelImporter::new(&path).import_sheet("Pharmacist_9");
    assert!(matches!(result, Err(GraphError::Import(_))));
}

#[test]
fn test_import_node_table_flags() {
    let (_dir, path) = fixture();
    let nodes = ExcelImporter::new(&path)
        .import_node_table("Nodes", "Name", "node_of_interest")
        .unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes.interesting_count(), 3);
    assert!(nodes.is_of_interest("LabValues"));
    assert!(!nodes.is_of_interest("Chart"));
    assert!(!nodes.is_of_interest("CheckDose"));
    assert!(!nodes.is_of_interest("NotListed"));
}

#[test]
fn test_import_node_table_missing_column() {
    let (_dir, path) = fixture();
    let result = ExcelImporter::new(&path).import_node_table("Nodes", "Name", "relevant");
    assert!(matches!(result, Err(GraphError::Import(_))));
}

#[test]
fn test_leading_blank_row_keeps_row_numbers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("offset.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("P1").unwrap();
    sheet.write_string(2, 1, "A").unwrap();
    sheet.write_string(2, 2, "x").unwrap();
    sheet.write_string(2, 3, "B").unwrap();
    workbook.save(&path).unwrap();

    let table = ExcelImporter::new(&path)
        .with_header(false)
        .import_sheet("P1")
        .unwrap();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[2], vec!["", "A", "x", "B"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// SESSION ROUND TRIP
// ═══════════════════════════════════════════════════════════════════════════

fn session(input: PathBuf, mode: ConversionMode, output: Option<PathBuf>) -> Session {
    let mut config = SessionConfig {
        input: Some(input),
        mode,
        nodes: Some(NodeSourceConfig::default()),
        ..Default::default()
    };
    config.output.workbook = output;
    Session::new(config).unwrap()
}

#[test]
fn test_normal_session_workbook_round_trip() {
    let (dir, path) = fixture();
    let output = dir.path().join("triples.xlsx");
    let session = session(path, ConversionMode::Normal, Some(output.clone()));

    let report = session.run().unwrap();
    session.write_outputs(&report).unwrap();

    let importer = ExcelImporter::new(&output);
    assert_eq!(
        importer.sheet_names().unwrap(),
        vec!["Pharmacist_1", "Pharmacist_2", TOTAL_LABEL, NODES_SHEET]
    );

    let total = importer.import_triples(TOTAL_LABEL).unwrap();
    assert_eq!(total.triples, report.total.triples);

    let p1 = importer.import_triples("Pharmacist_1").unwrap();
    let row3: Vec<(&str, &str, &str)> = p1
        .row(3)
        .iter()
        .map(|t| (t.source.as_str(), t.edge.as_str(), t.target.as_str()))
        .collect();
    assert_eq!(
        row3,
        vec![
            ("start", "is", "CheckDose"),
            ("CheckDose", "needsRequestOf", "Physician"),
            ("Physician", "is", "end"),
        ]
    );

    let listing = importer.import_sheet(NODES_SHEET).unwrap();
    assert_eq!(listing.row_count(), report.nodes.len());
}

#[test]
fn test_epa_session_uses_node_sheet() {
    let (_dir, path) = fixture();
    let report = session(path, ConversionMode::EpaStyle, None).run().unwrap();

    let p2: Vec<(&str, &str, &str)> = report.raters[1]
        .iter()
        .map(|t| (t.source.as_str(), t.edge.as_str(), t.target.as_str()))
        .collect();
    assert_eq!(
        p2,
        vec![
            ("start", "is", "TakeHistory"),
            ("TakeHistory", "needs", "LabValues"),
            ("LabValues", "is", "end"),
        ]
    );
}

#[test]
fn test_outcome_comparison_sheet() {
    let (dir, path) = fixture();
    let report = session(path, ConversionMode::EpaStyle, None).run().unwrap();
    let comparison = compare_outcomes(&report.total, &[]);
    assert_eq!(comparison.raters, vec!["Pharmacist_1", "Pharmacist_2"]);

    let needs = comparison
        .rows
        .iter()
        .find(|row| row.edge == "needs")
        .unwrap();
    assert_eq!(needs.source, "TakeHistory");
    assert_eq!(needs.target, "LabValues");
    assert_eq!(needs.occurrences, vec![vec![1], vec![1]]);
    assert_eq!(needs.count, 2);

    let request = comparison
        .rows
        .iter()
        .find(|row| row.edge == "needsRequestOf")
        .unwrap();
    assert_eq!(request.source, "");
    assert_eq!(request.count, 1);

    let output = dir.path().join("comparison.xlsx");
    let mut exporter = ExcelExporter::new();
    exporter.add_outcomes(&comparison).unwrap();
    exporter.save(&output).unwrap();

    let sheet = ExcelImporter::new(&output)
        .with_header(false)
        .import_sheet(OUTCOMES_SHEET)
        .unwrap();
    let mut expected: Vec<&str> = TRIPLE_COLUMNS[..3].to_vec();
    expected.extend(["Pharmacist_1", "Pharmacist_2", "Count"]);
    assert_eq!(sheet.rows[0], expected);
}
