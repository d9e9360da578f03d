//! Node collector for the "Nodes" listing

use crate::types::TripleTable;
use std::collections::HashSet;

/// Distinct node names across triple tables, in first-seen order.
///
/// Each table contributes its source column, then its target column.
#[derive(Debug, Clone, Default)]
pub struct NodeCollector {
    seen: HashSet<String>,
    nodes: Vec<String>,
}

impl NodeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: &TripleTable) {
        for triple in table.iter() {
            self.add(&triple.source);
        }
        for triple in table.iter() {
            self.add(&triple.target);
        }
    }

    /// Add one name; returns false if it was already collected
    pub fn add(&mut self, node: &str) -> bool {
        if self.seen.contains(node) {
            return false;
        }
        self.seen.insert(node.to_string());
        self.nodes.push(node.to_string());
        true
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<String> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Collect the distinct nodes of several tables
pub fn collect_nodes<'a, I>(tables: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a TripleTable>,
{
    let mut collector = NodeCollector::new();
    for table in tables {
        collector.add_table(table);
    }
    collector.into_nodes()
}
