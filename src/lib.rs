//! Medreview Graph - medication-review adjacency tables to triples
//!
//! Each rater's adjacency table (`source | edge | target | edge | target | ...`)
//! is converted into `start`/`end` bounded triples, optionally filtered to the
//! EPA nodes of interest.
//!
//! # Features
//!
//! - Cell normalization and `;` multi-value expansion
//! - Normal, EPA-style and plain (sentinel-free) conversion
//! - Workbook (.xlsx) and CSV input/output
//! - RDF/XML export and cross-rater outcome comparison
//!
//! # Example
//!
//! ```
//! use medreview_graph::core::{convert_table, RowConverter};
//! use medreview_graph::types::{ConversionMode, RaterTable};
//!
//! let table = RaterTable::from_rows("Pharmacist_1", &[vec!["Take History", "needs", "Labs"]]);
//! let converter = RowConverter::for_mode(ConversionMode::Normal, None)?;
//! let triples = convert_table(&converter, &table);
//!
//! let edges: Vec<&str> = triples.iter().map(|t| t.edge.as_str()).collect();
//! assert_eq!(edges, vec!["is", "needs", "is"]);
//! # Ok::<(), medreview_graph::error::GraphError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod delimited;
pub mod error;
pub mod excel;
pub mod rdf;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{GraphError, GraphResult};
pub use types::{ConversionMode, RaterTable, Triple, TripleTable};
