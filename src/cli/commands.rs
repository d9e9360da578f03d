use crate::config::{NodeSourceConfig, SessionConfig};
use crate::core::{collect_nodes, compare_outcomes, ConversionReport, NodeFilter, TOTAL_LABEL};
use crate::error::{GraphError, GraphResult};
use crate::excel::{ExcelExporter, ExcelImporter, NODES_SHEET};
use crate::rdf::{write_rater_graphs, DEFAULT_BASE_URI};
use crate::session::{load_raters, Session};
use crate::types::ConversionMode;
use colored::Colorize;
use std::path::PathBuf;

/// Command-line settings for `convert`; every `Some` overrides the session
/// file
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mode: Option<ConversionMode>,
    pub nodes: Option<PathBuf>,
    pub node_sheet: Option<String>,
    pub raters: Vec<String>,
    pub csv_dir: Option<PathBuf>,
    pub no_header: bool,
    pub config: Option<PathBuf>,
}

impl ConvertArgs {
    /// Merge the session file (if any) with the command-line overrides
    pub fn into_config(self) -> GraphResult<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };

        if self.input.is_some() {
            config.input = self.input;
        }
        if self.output.is_some() {
            config.output.workbook = self.output;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if !self.raters.is_empty() {
            config.raters = self.raters;
        }
        if self.csv_dir.is_some() {
            config.output.csv_dir = self.csv_dir;
        }
        if self.no_header {
            config.has_header = false;
        }

        if self.nodes.is_some() || self.node_sheet.is_some() {
            let nodes = config.nodes.get_or_insert_with(NodeSourceConfig::default);
            if self.nodes.is_some() {
                nodes.path = self.nodes;
            }
            if let Some(sheet) = self.node_sheet {
                nodes.sheet = sheet;
            }
        } else if config.mode.needs_node_table() && config.nodes.is_none() {
            // node sheet inside the input workbook
            config.nodes = Some(NodeSourceConfig::default());
        }

        Ok(config)
    }
}

fn print_report(report: &ConversionReport) {
    println!("{}", "✅ Conversion Results:".bold().green());
    for table in &report.raters {
        let rows = table.iter().map(|t| t.row_number).max().unwrap_or(0);
        println!(
            "   📋 {}: {} triples from {} rows",
            table.label.bright_blue().bold(),
            table.len(),
            rows
        );
    }
    println!(
        "   📊 {}: {} triples",
        report.total.label.bright_blue().bold(),
        report.total.len()
    );
    println!("   🔗 {}: {} distinct nodes", NODES_SHEET.bright_blue().bold(), report.nodes.len());
    println!();
}

/// Execute the convert command
pub fn convert(args: ConvertArgs, verbose: bool) -> GraphResult<()> {
    let config = args.into_config()?;
    let session = Session::new(config)?;
    let config = session.config();

    println!("{}", "💊 Medreview Graph - Converting adjacency tables".bold().green());
    if let Some(input) = &config.input {
        println!("   Input: {}", input.display());
    }
    println!("   Mode:  {}", config.mode.to_string().bright_yellow().bold());
    println!();

    if config.output.is_empty() {
        println!(
            "{}",
            "📋 No output configured (use -o or --csv-dir) - nothing will be written\n".yellow()
        );
    }

    if verbose {
        println!("{}", "📖 Reading rater tables...".cyan());
    }
    let tables = session.load_raters()?;
    if verbose {
        let labels: Vec<&str> = tables.iter().map(|t| t.label.as_str()).collect();
        println!("   Found {} raters: {}", tables.len(), labels.join(", "));
    }

    let nodes = if config.mode.needs_node_table() {
        if verbose {
            println!("{}", "🔎 Loading node reference table...".cyan());
        }
        let nodes = session.load_nodes()?;
        if verbose {
            if let Some(nodes) = &nodes {
                println!(
                    "   {} nodes, {} of interest",
                    nodes.len(),
                    nodes.interesting_count()
                );
            }
        }
        nodes
    } else {
        None
    };

    if verbose {
        println!("{}", "🧮 Converting rows to triples...".cyan());
    }
    let report = session.convert(&tables, nodes.as_ref().map(|n| n as &dyn NodeFilter))?;
    print_report(&report);

    if verbose && !config.output.is_empty() {
        println!("{}", "💾 Writing outputs...".cyan());
    }
    let written = session.write_outputs(&report)?;
    if !written.is_empty() {
        println!("{}", "💾 Written:".bold().green());
        for path in &written {
            println!("   {}", path.display());
        }
        println!();
    }

    Ok(())
}

/// Execute the rdf command: one `<rater>.rdf` per rater table
pub fn rdf(
    input: PathBuf,
    out_dir: PathBuf,
    base_uri: Option<String>,
    raters: Vec<String>,
    no_header: bool,
) -> GraphResult<()> {
    let base_uri = base_uri.unwrap_or_else(|| DEFAULT_BASE_URI.to_string());
    if base_uri.trim().is_empty() {
        return Err(GraphError::Config("base URI must not be empty".to_string()));
    }

    println!("{}", "💊 Medreview Graph - RDF/XML Export".bold().green());
    println!("   Input:    {}", input.display());
    println!("   Output:   {}", out_dir.display());
    println!("   Base URI: {}\n", base_uri.bright_yellow());

    let tables = load_raters(&input, &raters, !no_header, &[NODES_SHEET])?;
    let written = write_rater_graphs(&out_dir, &tables, &base_uri)?;

    println!("{}", "✅ Export Complete!".bold().green());
    for path in &written {
        println!("   {}", path.display());
    }
    println!();
    Ok(())
}

/// Execute the evaluate command: compare outcome triples across raters
pub fn evaluate(
    input: PathBuf,
    output: PathBuf,
    sheet: Option<String>,
    raters: Vec<String>,
) -> GraphResult<()> {
    let sheet = sheet.unwrap_or_else(|| TOTAL_LABEL.to_string());

    println!("{}", "💊 Medreview Graph - Outcome Comparison".bold().green());
    println!("   Input:  {} (sheet {})", input.display(), sheet.bright_blue());
    println!("   Output: {}\n", output.display());

    let total = ExcelImporter::new(&input).import_triples(&sheet)?;
    let comparison = compare_outcomes(&total, &raters);

    let mut exporter = ExcelExporter::new();
    exporter.add_outcomes(&comparison)?;
    exporter.save(&output)?;

    let unanimous = comparison.unanimous().count();
    println!("{}", "✅ Comparison Results:".bold().green());
    println!("   Raters:    {}", comparison.raters.join(", ").bright_blue());
    println!("   Outcomes:  {}", comparison.rows.len());
    println!("   Unanimous: {}", unanimous.to_string().bold());
    for row in comparison.unanimous() {
        println!(
            "      {} {} {}",
            row.source.cyan(),
            row.edge.bright_yellow(),
            row.target.cyan()
        );
    }
    println!();
    Ok(())
}

/// Execute the nodes command: print the distinct node names of a triple sheet
pub fn nodes(input: PathBuf, sheet: Option<String>) -> GraphResult<()> {
    let sheet = sheet.unwrap_or_else(|| TOTAL_LABEL.to_string());
    let table = ExcelImporter::new(&input).import_triples(&sheet)?;
    let nodes = collect_nodes(std::iter::once(&table));

    println!(
        "{}",
        format!("🔗 {} distinct nodes in {}", nodes.len(), sheet).bold().green()
    );
    for node in &nodes {
        println!("   {}", node);
    }
    Ok(())
}
