use clap::{ArgAction, Parser, Subcommand};
use medreview_graph::cli::{self, ConvertArgs};
use medreview_graph::types::ConversionMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "medgraph")]
#[command(about = "Convert medication-review adjacency tables into start/end bounded triples.")]
#[command(long_about = "Medreview Graph - adjacency tables to triples

Each worksheet (or CSV file) holds one rater's adjacency rows:
  source | edge | target | edge | target | ...
Every row becomes a start -> is -> ... -> is -> end chain of triples.

COMMANDS:
  convert   - Adjacency workbook/CSV to triple workbook (+ CSV)
  rdf       - Adjacency workbook/CSV to RDF/XML, one file per rater
  evaluate  - Compare outcome triples across raters
  nodes     - List the distinct nodes of a triple sheet

EXAMPLES:
  medgraph convert adjacency.xlsx -o triples.xlsx
  medgraph convert adjacency.xlsx -o epa.xlsx --mode epa_style
  medgraph rdf adjacency.xlsx RDF/
  medgraph evaluate triples.xlsx -o comparison.xlsx")]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert adjacency rows into triples.

Writes one worksheet per rater, a 'Total' worksheet with all raters and a
'Nodes' worksheet with every distinct node name.

MODES:
  normal     - start/end bounded rows (default)
  epa_style  - keep only EPA nodes of interest; needs a node table
               ('Nodes' sheet of the input, or --nodes)
  plain      - real edges only, no start/end

SESSION FILE:
  Settings can come from a YAML file (--config or MEDGRAPH_CONFIG);
  command-line flags override it.")]
    /// Convert adjacency tables to triples
    Convert {
        /// Workbook, CSV file or directory of CSV files
        input: Option<PathBuf>,

        /// Output workbook (.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Conversion mode: normal, epa_style or plain
        #[arg(short, long)]
        mode: Option<ConversionMode>,

        /// Node reference workbook or CSV (defaults to the input workbook)
        #[arg(long)]
        nodes: Option<PathBuf>,

        /// Worksheet holding the node reference table
        #[arg(long)]
        node_sheet: Option<String>,

        /// Raters (worksheet titles) to convert, comma separated
        #[arg(short, long, value_delimiter = ',')]
        raters: Vec<String>,

        /// Also write one CSV per rater into this directory
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Adjacency sheets have no header row
        #[arg(long)]
        no_header: bool,

        /// YAML session file
        #[arg(short, long, env = "MEDGRAPH_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Export rater tables as RDF/XML
    Rdf {
        /// Workbook, CSV file or directory of CSV files
        input: PathBuf,

        /// Directory for the <rater>.rdf files
        out_dir: PathBuf,

        /// URI prefix for nodes and edges
        #[arg(long)]
        base_uri: Option<String>,

        /// Raters (worksheet titles) to export, comma separated
        #[arg(short, long, value_delimiter = ',')]
        raters: Vec<String>,

        /// Adjacency sheets have no header row
        #[arg(long)]
        no_header: bool,
    },

    #[command(long_about = "Compare outcome triples across raters.

Reads a triple sheet written by 'convert' (default 'Total') and writes an
'Outcome_Comparison' worksheet: one row per distinct outcome triple, the
row numbers where each rater produced it, and the number of raters.")]
    /// Compare outcome triples across raters
    Evaluate {
        /// Triple workbook written by 'convert'
        input: PathBuf,

        /// Output workbook (.xlsx)
        #[arg(short, long)]
        output: PathBuf,

        /// Triple sheet to read
        #[arg(short, long)]
        sheet: Option<String>,

        /// Rater columns, comma separated (default: raters in the sheet)
        #[arg(short, long, value_delimiter = ',')]
        raters: Vec<String>,
    },

    /// List the distinct nodes of a triple sheet
    Nodes {
        /// Triple workbook written by 'convert'
        input: PathBuf,

        /// Triple sheet to read
        #[arg(short, long)]
        sheet: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("medreview_graph={level},medgraph={level}").into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            mode,
            nodes,
            node_sheet,
            raters,
            csv_dir,
            no_header,
            config,
        } => cli::convert(
            ConvertArgs {
                input,
                output,
                mode,
                nodes,
                node_sheet,
                raters,
                csv_dir,
                no_header,
                config,
            },
            cli.verbose > 0,
        )?,

        Commands::Rdf {
            input,
            out_dir,
            base_uri,
            raters,
            no_header,
        } => cli::rdf(input, out_dir, base_uri, raters, no_header)?,

        Commands::Evaluate {
            input,
            output,
            sheet,
            raters,
        } => cli::evaluate(input, output, sheet, raters)?,

        Commands::Nodes { input, sheet } => cli::nodes(input, sheet)?,
    }

    Ok(())
}
