//! EPA node filter: decides whether a node belongs to the evaluated
//! professional-activity ontology.

use crate::error::{GraphError, GraphResult};
use std::collections::HashMap;
use tracing::warn;

/// Decides which target nodes survive EPA-style conversion
pub trait NodeFilter: Sync {
    fn is_of_interest(&self, node: &str) -> bool;
}

/// Node name -> "of interest" flag, loaded once per conversion run.
///
/// Names match exactly. A flag cell that is empty (after trimming) means
/// "not of interest"; any other content means "of interest".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeReferenceTable {
    flags: HashMap<String, bool>,
}

impl NodeReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, flag cell)` rows; later duplicates are ignored
    pub fn from_rows<N, F, I>(rows: I) -> Self
    where
        N: Into<String>,
        F: AsRef<str>,
        I: IntoIterator<Item = (N, F)>,
    {
        let mut table = Self::new();
        for (name, flag) in rows {
            table.insert(name, flag.as_ref());
        }
        table
    }

    /// Register a node. The first row for a name wins.
    pub fn insert(&mut self, name: impl Into<String>, flag: &str) {
        self.flags
            .entry(name.into())
            .or_insert_with(|| !flag.trim().is_empty());
    }

    /// Flag of `name`, or `UnknownNode` if the table has no such row
    pub fn lookup(&self, name: &str) -> GraphResult<bool> {
        self.flags
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of nodes flagged as of interest
    pub fn interesting_count(&self) -> usize {
        self.flags.values().filter(|flag| **flag).count()
    }
}

impl NodeFilter for NodeReferenceTable {
    fn is_of_interest(&self, node: &str) -> bool {
        match self.lookup(node) {
            Ok(flag) => flag,
            Err(e) => {
                warn!(node, error = %e, "EPA lookup failed, treating node as not of interest");
                false
            }
        }
    }
}
