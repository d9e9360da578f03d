//! Table conversion driver: runs the row engine over whole rater tables and
//! keeps the cross-rater aggregate.

use crate::core::engine::RowConverter;
use crate::core::nodes::NodeCollector;
use crate::core::normalize::normalize_table;
use crate::types::{RaterTable, TripleTable};
use std::thread;
use tracing::{debug, info};

/// Label of the cross-rater aggregate table
pub const TOTAL_LABEL: &str = "Total";

/// Convert one rater table: normalize every cell, then run the engine per
/// row in input order. Row numbers are 1-based input positions.
pub fn convert_table(converter: &RowConverter<'_>, table: &RaterTable) -> TripleTable {
    let mut normalized = table.clone();
    normalize_table(&mut normalized);

    let mut output = TripleTable::new(table.label.clone());
    for (index, row) in normalized.rows.iter().enumerate() {
        let row_number = index as u32 + 1;
        let triples = converter.convert_row(row, row_number, &table.label);
        debug!(rater = %table.label, row_number, triples = triples.len(), "converted row");
        output.triples.extend(triples);
    }

    info!(
        rater = %table.label,
        rows = table.row_count(),
        triples = output.len(),
        "converted rater table"
    );
    output
}

/// Result of a conversion session
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    /// One table per rater, in input order
    pub raters: Vec<TripleTable>,
    /// All rater tables concatenated
    pub total: TripleTable,
    /// Distinct source/target names over all rater tables
    pub nodes: Vec<String>,
}

/// Accumulates rater tables into a [`ConversionReport`]
pub struct TableConverter<'f> {
    converter: RowConverter<'f>,
    raters: Vec<TripleTable>,
    total: TripleTable,
    nodes: NodeCollector,
}

impl<'f> TableConverter<'f> {
    pub fn new(converter: RowConverter<'f>) -> Self {
        Self {
            converter,
            raters: Vec::new(),
            total: TripleTable::new(TOTAL_LABEL),
            nodes: NodeCollector::new(),
        }
    }

    /// Convert one rater table and add it to the aggregate
    pub fn convert(&mut self, table: &RaterTable) -> &TripleTable {
        let output = convert_table(&self.converter, table);
        self.record(output)
    }

    /// Convert several tables concurrently. Results are aggregated in input
    /// order, so the outcome equals calling [`convert`](Self::convert) in turn.
    pub fn convert_all(&mut self, tables: &[RaterTable]) {
        let converter = self.converter;
        let outputs: Vec<TripleTable> = thread::scope(|scope| {
            let handles: Vec<_> = tables
                .iter()
                .map(|table| scope.spawn(move || convert_table(&converter, table)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });
        for output in outputs {
            self.record(output);
        }
    }

    fn record(&mut self, output: TripleTable) -> &TripleTable {
        self.total.append(&output);
        self.nodes.add_table(&output);
        self.raters.push(output);
        &self.raters[self.raters.len() - 1]
    }

    pub fn total(&self) -> &TripleTable {
        &self.total
    }

    pub fn raters(&self) -> &[TripleTable] {
        &self.raters
    }

    pub fn nodes(&self) -> &[String] {
        self.nodes.nodes()
    }

    pub fn finish(self) -> ConversionReport {
        ConversionReport {
            raters: self.raters,
            total: self.total,
            nodes: self.nodes.into_nodes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConversionMode;

    fn rater(label: &str, rows: &[Vec<&str>]) -> RaterTable {
        RaterTable::from_rows(label, rows)
    }

    #[test]
    fn test_row_numbers_follow_input() {
        let converter = RowConverter::for_mode(ConversionMode::Normal, None).unwrap();
        let table = rater(
            "P1",
            &[
                vec!["A", "x", "B"],
                vec!["", "", ""],
                vec!["C", "", ""],
            ],
        );
        let output = convert_table(&converter, &table);
        let rows: Vec<u32> = output.iter().map(|t| t.row_number).collect();
        assert_eq!(rows, vec![1, 1, 1, 3, 3]);
        assert!(output.iter().all(|t| t.rater_label == "P1"));
    }

    #[test]
    fn test_cells_are_normalized() {
        let converter = RowConverter::for_mode(ConversionMode::Normal, None).unwrap();
        let table = rater("P1", &[vec!["Take History", "needs", "Lab: Values, Old"]]);
        let output = convert_table(&converter, &table);
        assert_eq!(output.triples[1].source, "TakeHistory");
        assert_eq!(output.triples[1].target, "LabValuesOld");
    }

    #[test]
    fn test_total_and_nodes_accumulate() {
        let converter = RowConverter::for_mode(ConversionMode::Normal, None).unwrap();
        let mut driver = TableConverter::new(converter);
        driver.convert(&rater("P1", &[vec!["A", "x", "B"]]));
        driver.convert(&rater("P2", &[vec!["B", "y", "C"]]));

        assert_eq!(driver.raters().len(), 2);
        assert_eq!(driver.total().len(), 6);
        assert_eq!(driver.total().label, TOTAL_LABEL);
        assert_eq!(driver.nodes(), &["start", "A", "B", "end", "C"]);
    }

    #[test]
    fn test_convert_all_matches_sequential() {
        let tables = vec![
            rater("P1", &[vec!["A", "x", "B;C"], vec!["D", "", ""]]),
            rater("P2", &[vec!["E", "y", "F", "z", "G"]]),
            rater("P3", &[vec!["H"]]),
        ];
        let converter = RowConverter::for_mode(ConversionMode::Normal, None).unwrap();

        let mut sequential = TableConverter::new(converter);
        for table in &tables {
            sequential.convert(table);
        }
        let mut parallel = TableConverter::new(converter);
        parallel.convert_all(&tables);

        let sequential = sequential.finish();
        let parallel = parallel.finish();
        assert_eq!(sequential.raters, parallel.raters);
        assert_eq!(sequential.total, parallel.total);
        assert_eq!(sequential.nodes, parallel.nodes);
    }
}
