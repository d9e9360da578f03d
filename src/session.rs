//! A conversion run: load rater tables and the node reference table, convert
//! every rater, write the configured outputs.

use crate::config::{NodeSourceConfig, SessionConfig};
use crate::core::{ConversionReport, NodeFilter, NodeReferenceTable, RowConverter, TableConverter};
use crate::delimited::{read_node_csv, read_rater_csv, write_nodes_csv, write_rater_csvs};
use crate::error::{GraphError, GraphResult};
use crate::excel::{ExcelExporter, ExcelImporter, NODES_SHEET};
use crate::types::RaterTable;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Load rater tables from a workbook, a CSV file or a directory of CSVs.
///
/// `raters` selects sheets (or CSV stems) by name, in the given order; when
/// empty every sheet except those in `skip` is loaded.
pub fn load_raters(
    input: &Path,
    raters: &[String],
    has_header: bool,
    skip: &[&str],
) -> GraphResult<Vec<RaterTable>> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(input)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_csv(path))
            .collect();
        files.sort();
        let tables = files
            .iter()
            .map(|path| read_rater_csv(path, has_header))
            .collect::<GraphResult<Vec<_>>>()?;
        return select_raters(tables, raters);
    }

    if is_csv(input) {
        let table = read_rater_csv(input, has_header)?;
        return select_raters(vec![table], raters);
    }

    ExcelImporter::new(input)
        .with_header(has_header)
        .import_raters(raters, skip)
}

fn select_raters(tables: Vec<RaterTable>, raters: &[String]) -> GraphResult<Vec<RaterTable>> {
    if raters.is_empty() {
        return Ok(tables);
    }
    let mut selected = Vec::with_capacity(raters.len());
    for rater in raters {
        let table = tables
            .iter()
            .find(|t| &t.label == rater)
            .cloned()
            .ok_or_else(|| GraphError::Import(format!("no rater table named '{}'", rater)))?;
        selected.push(table);
    }
    Ok(selected)
}

/// Load the node reference table from a workbook sheet or a CSV file
pub fn load_node_table(path: &Path, source: &NodeSourceConfig) -> GraphResult<NodeReferenceTable> {
    if is_csv(path) {
        read_node_csv(path, &source.name_column, &source.flag_column)
    } else {
        ExcelImporter::new(path).import_node_table(
            &source.sheet,
            &source.name_column,
            &source.flag_column,
        )
    }
}

/// One configured conversion run
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn input(&self) -> GraphResult<&Path> {
        self.config
            .input
            .as_deref()
            .ok_or_else(|| GraphError::Config("no input file given".to_string()))
    }

    /// Rater tables named by the session (node sheet excluded)
    pub fn load_raters(&self) -> GraphResult<Vec<RaterTable>> {
        let skip: Vec<&str> = self
            .config
            .nodes
            .as_ref()
            .map(|nodes| vec![nodes.sheet.as_str()])
            .unwrap_or_default();
        load_raters(self.input()?, &self.config.raters, self.config.has_header, &skip)
    }

    /// Node reference table, if the session has a node source
    pub fn load_nodes(&self) -> GraphResult<Option<NodeReferenceTable>> {
        match (self.config.nodes.as_ref(), self.config.node_source_path()) {
            (Some(source), Some(path)) => Ok(Some(load_node_table(path, source)?)),
            _ => Ok(None),
        }
    }

    /// Convert every rater table
    pub fn run(&self) -> GraphResult<ConversionReport> {
        let tables = self.load_raters()?;
        let nodes = if self.config.mode.needs_node_table() {
            self.load_nodes()?
        } else {
            None
        };
        let report = self.convert(&tables, nodes.as_ref().map(|n| n as &dyn NodeFilter))?;
        info!(
            mode = %self.config.mode,
            raters = report.raters.len(),
            triples = report.total.len(),
            nodes = report.nodes.len(),
            "conversion finished"
        );
        Ok(report)
    }

    /// Convert already loaded tables
    pub fn convert(
        &self,
        tables: &[RaterTable],
        filter: Option<&dyn NodeFilter>,
    ) -> GraphResult<ConversionReport> {
        let converter = RowConverter::for_mode(self.config.mode, filter)?;
        let mut driver = TableConverter::new(converter);
        driver.convert_all(tables);
        Ok(driver.finish())
    }

    /// Write the workbook and CSV outputs; returns the written paths
    pub fn write_outputs(&self, report: &ConversionReport) -> GraphResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        if let Some(path) = &self.config.output.workbook {
            let mut exporter = ExcelExporter::new();
            exporter.add_report(report)?;
            debug!(sheets = ?exporter.sheet_names(), "workbook layout");
            exporter.save(path)?;
            written.push(path.clone());
        }
        if let Some(dir) = &self.config.output.csv_dir {
            written.extend(write_rater_csvs(dir, &report.raters)?);
            let nodes = dir.join(format!("{}.csv", NODES_SHEET));
            write_nodes_csv(&nodes, &report.nodes)?;
            written.push(nodes);
        }
        Ok(written)
    }
}
