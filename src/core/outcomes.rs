//! Cross-rater outcome comparison
//!
//! Groups the outcome triples of the aggregate table and records, per rater,
//! the rows in which each outcome appears.

use crate::types::{is_outcome_edge, TripleTable};
use std::collections::HashMap;

/// Edge whose source is ignored when comparing outcomes
const SOURCELESS_EDGE: &str = "needsRequestOf";

/// One distinct outcome statement and where each rater produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRow {
    pub source: String,
    pub edge: String,
    pub target: String,
    /// Row numbers per rater, aligned with [`OutcomeComparison::raters`]
    pub occurrences: Vec<Vec<u32>>,
    /// Number of raters with at least one occurrence
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutcomeComparison {
    pub raters: Vec<String>,
    pub rows: Vec<OutcomeRow>,
}

impl OutcomeComparison {
    /// Outcomes produced by every rater
    pub fn unanimous(&self) -> impl Iterator<Item = &OutcomeRow> {
        let all = self.raters.len();
        self.rows.iter().filter(move |row| row.count == all)
    }
}

/// Compare outcome triples across raters.
///
/// `raters` fixes the rater columns; when empty, raters are taken from the
/// table in first-seen order. Triples of unlisted raters still create rows
/// but do not count.
pub fn compare_outcomes(total: &TripleTable, raters: &[String]) -> OutcomeComparison {
    let raters: Vec<String> = if raters.is_empty() {
        let mut seen = Vec::new();
        for triple in total.iter() {
            if !seen.contains(&triple.rater_label) {
                seen.push(triple.rater_label.clone());
            }
        }
        seen
    } else {
        raters.to_vec()
    };

    let mut index: HashMap<(String, String, String), usize> = HashMap::new();
    let mut rows: Vec<OutcomeRow> = Vec::new();

    for triple in total.iter().filter(|t| is_outcome_edge(&t.edge)) {
        let source = if triple.edge == SOURCELESS_EDGE {
            String::new()
        } else {
            triple.source.clone()
        };
        let key = (source, triple.edge.clone(), triple.target.clone());
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            rows.push(OutcomeRow {
                source: key.0,
                edge: key.1,
                target: key.2,
                occurrences: vec![Vec::new(); raters.len()],
                count: 0,
            });
            rows.len() - 1
        });
        if let Some(column) = raters.iter().position(|r| *r == triple.rater_label) {
            rows[slot].occurrences[column].push(triple.row_number);
        }
    }

    for row in &mut rows {
        row.count = row.occurrences.iter().filter(|o| !o.is_empty()).count();
    }

    OutcomeComparison { raters, rows }
}
