//! Row-to-triple conversion: normalization, expansion, EPA filtering, the
//! row engine and the table driver

pub mod driver;
pub mod engine;
pub mod epa_filter;
pub mod expand;
pub mod nodes;
pub mod normalize;
pub mod outcomes;

pub use driver::{convert_table, ConversionReport, TableConverter, TOTAL_LABEL};
pub use engine::{Hop, ParsedRow, RowConverter};
pub use epa_filter::{NodeFilter, NodeReferenceTable};
pub use nodes::{collect_nodes, NodeCollector};
pub use normalize::{normalize_cell, normalize_table};
pub use outcomes::{compare_outcomes, OutcomeComparison, OutcomeRow};
