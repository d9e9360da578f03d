//! Session configuration (YAML)
//!
//! ```yaml
//! input: adjacency.xlsx
//! raters: [Pharmacist_1, Pharmacist_2]
//! mode: epa_style
//! nodes:
//!   sheet: Nodes
//! output:
//!   workbook: triples.xlsx
//!   csv_dir: CSV
//! ```
//!
//! Every field is optional; command-line flags override file values.

use crate::error::{GraphError, GraphResult};
use crate::rdf::DEFAULT_BASE_URI;
use crate::types::ConversionMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Workbook, CSV file or directory of CSV files with adjacency rows
    pub input: Option<PathBuf>,
    /// Worksheet titles (or CSV stems) to convert; empty means all
    pub raters: Vec<String>,
    pub mode: ConversionMode,
    /// First row of every adjacency sheet is a header
    pub has_header: bool,
    /// Node reference source, required by `epa_style`
    pub nodes: Option<NodeSourceConfig>,
    pub output: OutputConfig,
    pub rdf: RdfConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            input: None,
            raters: Vec::new(),
            mode: ConversionMode::Normal,
            has_header: true,
            nodes: None,
            output: OutputConfig::default(),
            rdf: RdfConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSourceConfig {
    /// Workbook or CSV; defaults to the session input
    pub path: Option<PathBuf>,
    pub sheet: String,
    pub name_column: String,
    pub flag_column: String,
}

impl Default for NodeSourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            sheet: "Nodes".to_string(),
            name_column: "Name".to_string(),
            flag_column: "node_of_interest".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub workbook: Option<PathBuf>,
    pub csv_dir: Option<PathBuf>,
}

impl OutputConfig {
    /// True when no sink is configured
    pub fn is_empty(&self) -> bool {
        self.workbook.is_none() && self.csv_dir.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RdfConfig {
    pub base_uri: String,
}

impl Default for RdfConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
        }
    }
}

impl SessionConfig {
    /// Load a session file
    pub fn load(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> GraphResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the settings a conversion run depends on
    pub fn validate(&self) -> GraphResult<()> {
        if self.input.is_none() {
            return Err(GraphError::Config("no input file given".to_string()));
        }
        if self.mode.needs_node_table() && self.nodes.is_none() {
            return Err(GraphError::Config(format!(
                "mode '{}' needs a node reference table (nodes section or --nodes)",
                self.mode
            )));
        }
        if self.rdf.base_uri.trim().is_empty() {
            return Err(GraphError::Config("rdf base_uri must not be empty".to_string()));
        }
        Ok(())
    }

    /// Where the node reference table is read from
    pub fn node_source_path(&self) -> Option<&Path> {
        let nodes = self.nodes.as_ref()?;
        nodes.path.as_deref().or(self.input.as_deref())
    }
}
