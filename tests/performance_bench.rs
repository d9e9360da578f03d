//! Performance benchmarks for the conversion pipeline
//!
//! Run with: cargo test --release perf_ -- --ignored --nocapture
//!
//! Each benchmark writes a generated adjacency CSV per rater into a temp dir,
//! then times the read phase and the conversion phase separately.

use medreview_graph::core::{NodeFilter, NodeReferenceTable, RowConverter, TableConverter};
use medreview_graph::delimited::read_rater_csv;
use medreview_graph::types::ConversionMode;
use std::fmt::Write as _;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const NODES: [&str; 8] = [
    "Take History",
    "Lab Values",
    "Physician",
    "Check Dose",
    "Chart",
    "Interaction Check",
    "Renal Function",
    "Ward Nurse",
];
const EDGES: [&str; 4] = ["needs", "informs", "reviews", "hasOutcome"];

/// Adjacency CSV with `rows` rows of up to four hops; every seventh target
/// is multi-valued and every eleventh row stops early
fn generate_rater_csv(rows: usize, seed: usize) -> String {
    let mut csv = String::with_capacity(rows * 80);
    csv.push_str("Source,Edge,Target,Edge,Target,Edge,Target,Edge,Target\n");
    for i in 0..rows {
        let k = i + seed;
        let hops = if k % 11 == 0 { 1 } else { 4 };
        let _ = write!(csv, "{}", NODES[k % NODES.len()]);
        for h in 0..4 {
            if h < hops {
                let target = if (k + h) % 7 == 0 {
                    format!(
                        "{};{}",
                        NODES[(k + h + 1) % NODES.len()],
                        NODES[(k + h + 2) % NODES.len()]
                    )
                } else {
                    NODES[(k + h + 3) % NODES.len()].to_string()
                };
                let _ = write!(csv, ",{},{}", EDGES[(k + h) % EDGES.len()], target);
            } else {
                csv.push_str(",,");
            }
        }
        csv.push('\n');
    }
    csv
}

fn node_table() -> NodeReferenceTable {
    NodeReferenceTable::from_rows(
        NODES
            .iter()
            .enumerate()
            .map(|(i, name)| (name.replace(' ', ""), if i % 3 == 0 { "" } else { "x" })),
    )
}

/// Benchmark read + convert for `raters` tables of `rows` rows each
fn bench_convert(
    mode: ConversionMode,
    raters: usize,
    rows: usize,
) -> Result<(Duration, Duration, usize), String> {
    let dir = TempDir::new().map_err(|e| format!("Failed to create temp dir: {}", e))?;
    let mut paths = Vec::with_capacity(raters);
    for r in 0..raters {
        let path = dir.path().join(format!("Pharmacist_{}.csv", r + 1));
        std::fs::write(&path, generate_rater_csv(rows, r))
            .map_err(|e| format!("Failed to write fixture: {}", e))?;
        paths.push(path);
    }

    let read_start = Instant::now();
    let tables = paths
        .iter()
        .map(|path| read_rater_csv(path, true))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Read error: {}", e))?;
    let read_time = read_start.elapsed();

    let nodes = node_table();
    let filter: Option<&dyn NodeFilter> = if mode.needs_node_table() {
        Some(&nodes)
    } else {
        None
    };
    let convert_start = Instant::now();
    let converter = RowConverter::for_mode(mode, filter).map_err(|e| format!("Config error: {}", e))?;
    let mut driver = TableConverter::new(converter);
    driver.convert_all(&tables);
    let report = driver.finish();
    let convert_time = convert_start.elapsed();

    Ok((read_time, convert_time, report.total.len()))
}

#[test]
fn perf_smoke_small_tables() {
    let (read, convert, triples) = bench_convert(ConversionMode::Normal, 2, 50).unwrap();
    assert!(triples > 200);
    assert!((read + convert).as_secs() < 10);
}

#[test]
#[ignore] // Run with: cargo test perf_normal_4x10000_rows -- --ignored --nocapture
fn perf_normal_4x10000_rows() {
    let (read, convert, triples) = bench_convert(ConversionMode::Normal, 4, 10_000).unwrap();
    let total = read + convert;
    println!(
        "\n📊 4 x 10,000 rows (normal): read={:?}, convert={:?}, total={:?}, triples={}",
        read, convert, total, triples
    );
    assert!(
        total.as_millis() < 5000,
        "40,000 rows should convert in <5s, got {:?}",
        total
    );
}

#[test]
#[ignore] // Run with: cargo test perf_epa_4x10000_rows -- --ignored --nocapture
fn perf_epa_4x10000_rows() {
    let (read, convert, triples) = bench_convert(ConversionMode::EpaStyle, 4, 10_000).unwrap();
    let total = read + convert;
    println!(
        "\n📊 4 x 10,000 rows (epa_style): read={:?}, convert={:?}, total={:?}, triples={}",
        read, convert, total, triples
    );
    assert!(
        total.as_millis() < 5000,
        "40,000 rows should convert in <5s, got {:?}",
        total
    );
}

#[test]
#[ignore]
fn perf_normal_8x50000_rows() {
    let (read, convert, triples) = bench_convert(ConversionMode::Normal, 8, 50_000).unwrap();
    let total = read + convert;
    println!(
        "\n📊 8 x 50,000 rows (normal): read={:?}, convert={:?}, total={:?}, triples={}",
        read, convert, total, triples
    );
    assert!(
        total.as_millis() < 30000,
        "400,000 rows should convert in <30s, got {:?}",
        total
    );
}
