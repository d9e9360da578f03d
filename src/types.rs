use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Vocabulary
//==============================================================================

/// Sentinel source opening every process instance
pub const START_NODE: &str = "start";

/// Sentinel target closing every process instance
pub const END_NODE: &str = "end";

/// Edge paired with both sentinels
pub const SENTINEL_EDGE: &str = "is";

/// Generic edge for hops whose semantic target was filtered out
pub const CONNECTED_TO: &str = "connectedTo";

/// Edges denoting a clinical outcome.
///
/// Shared by the EPA filter bypass, the carried-edge relabelling and the
/// outcome comparison.
pub const OUTCOME_EDGES: &[&str] = &[
    "needs",
    "needsRequestOf",
    "needsClarificationOf",
    "hasOutcome",
    "giveProposalOf",
    "needsResearchIn",
];

/// Separator for multi-valued cells
pub const MULTI_VALUE_SEPARATOR: char = ';';

pub fn is_outcome_edge(edge: &str) -> bool {
    OUTCOME_EDGES.contains(&edge)
}

//==============================================================================
// Input tables
//==============================================================================

/// One rater's adjacency list: label plus a rectangular grid of text cells.
///
/// Cell 0 of every row is the first source; the remaining cells alternate
/// edge, target, edge, target, ...
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RaterTable {
    pub label: String,
    pub rows: Vec<Vec<String>>,
}

impl RaterTable {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rows: Vec::new(),
        }
    }

    /// Build a table from string slices, padding short rows to the widest one
    pub fn from_rows<S: AsRef<str>>(label: impl Into<String>, rows: &[Vec<S>]) -> Self {
        let mut table = Self::new(label);
        for row in rows {
            table.add_row(row.iter().map(|c| c.as_ref().to_string()).collect());
        }
        table.pad_rows();
        table
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Pad every row with empty cells up to the table width, like a sheet grid
    pub fn pad_rows(&mut self) {
        let width = self.width();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}

//==============================================================================
// Output triples
//==============================================================================

/// A (source, edge, target) statement plus its position in the input.
///
/// Serialized with the column headings of the triple sheets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    #[serde(rename = "Source_Node")]
    pub source: String,
    #[serde(rename = "Relationship")]
    pub edge: String,
    #[serde(rename = "Target_Node")]
    pub target: String,
    /// 1-based row of the originating process within its table
    #[serde(rename = "Subprocess")]
    pub row_number: u32,
    /// 1-based position within the row's emitted sequence
    #[serde(rename = "Step")]
    pub sequence_number: u32,
    #[serde(rename = "Pharmacists_Label")]
    pub rater_label: String,
}

impl Triple {
    pub fn is_start(&self) -> bool {
        self.source == START_NODE && self.edge == SENTINEL_EDGE
    }

    pub fn is_end(&self) -> bool {
        self.target == END_NODE && self.edge == SENTINEL_EDGE
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.source, self.edge, self.target)
    }
}

/// Column headings of every triple sheet / CSV, in order
pub const TRIPLE_COLUMNS: [&str; 6] = [
    "Source_Node",
    "Relationship",
    "Target_Node",
    "Subprocess",
    "Step",
    "Pharmacists_Label",
];

/// Ordered triple collection for one rater (or the cross-rater total)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TripleTable {
    pub label: String,
    pub triples: Vec<Triple>,
}

impl TripleTable {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            triples: Vec::new(),
        }
    }

    pub fn push(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn append(&mut self, other: &TripleTable) {
        self.triples.extend(other.triples.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples belonging to one process row
    pub fn row(&self, row_number: u32) -> Vec<&Triple> {
        self.triples
            .iter()
            .filter(|t| t.row_number == row_number)
            .collect()
    }
}

//==============================================================================
// Conversion modes
//==============================================================================

/// Engine switches. The named modes are presets over these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Bound each row with `start -> is -> ...` and `... -> is -> end`
    pub sentinels: bool,
    /// Drop targets that are not flagged in the node reference table
    pub epa_filter: bool,
    /// Relabel non-outcome edges of carried hops to `connectedTo`
    pub relabel_carried: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Real edges only, no sentinels
    Plain,
    /// Sentinel-bounded rows
    #[default]
    Normal,
    /// Sentinel-bounded rows, filtered to EPA nodes of interest
    EpaStyle,
}

impl ConversionMode {
    pub fn options(self) -> ConversionOptions {
        match self {
            ConversionMode::Plain => ConversionOptions {
                sentinels: false,
                epa_filter: false,
                relabel_carried: false,
            },
            ConversionMode::Normal => ConversionOptions {
                sentinels: true,
                epa_filter: false,
                relabel_carried: false,
            },
            ConversionMode::EpaStyle => ConversionOptions {
                sentinels: true,
                epa_filter: true,
                relabel_carried: true,
            },
        }
    }

    pub fn needs_node_table(self) -> bool {
        self.options().epa_filter
    }
}

impl FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "plain" => Ok(ConversionMode::Plain),
            "normal" => Ok(ConversionMode::Normal),
            "epa_style" | "epa" => Ok(ConversionMode::EpaStyle),
            other => Err(format!(
                "unknown mode '{}' (expected plain, normal or epa_style)",
                other
            )),
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionMode::Plain => "plain",
            ConversionMode::Normal => "normal",
            ConversionMode::EpaStyle => "epa_style",
        };
        f.write_str(name)
    }
}
