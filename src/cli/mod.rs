use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::visualization::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "adjgraph",
    version,
    about = "Render and merge directed graphs built from KEY=V1,V2,... records",
    long_about = "Build a directed graph from a properties-style file where each line names a node and its out-edges (SOURCE=TARGET_1,TARGET_2,...), then print it as Graphviz DOT or yEd GraphML. Several graphs can be merged, with optional version squashing for Maven coordinates, intersection analysis and pattern-based styling."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Dot,
    Graphml,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Dot => OutputFormat::Dot,
            FormatArg::Graphml => OutputFormat::Graphml,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render one record file, walking the graph from its roots
    Render {
        /// Input file with one SOURCE=TARGET_1,TARGET_2,... record per line
        input: PathBuf,
        /// Output file (stdout by default)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Start from this node instead of every node without incoming edges
        #[arg(long)]
        root: Option<String>,
        /// Do not print the root nodes or their direct edges
        #[arg(long, default_value_t = false)]
        suppress_roots: bool,
        /// Output format (defaults to the config file's, else dot)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Merge several record files into one graph
    Merge {
        /// Input files; each becomes its own graph before merging
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
        /// Output file (stdout by default)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Remove versions from node names before merging (needs 2+ inputs)
        #[arg(long, default_value_t = false)]
        squash_versions: bool,
        /// Number of leading ':'-separated name components kept when squashing
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        squash_components: Option<u16>,
        /// Colour shared and graph-unique nodes (needs 2+ inputs)
        #[arg(long, default_value_t = false)]
        analyze: bool,
        /// Regular expression (full match) of node names to highlight, applied last
        #[arg(long)]
        highlight_pattern: Option<String>,
        /// JSON file of style rules: [{"pattern": ..., "attributes": {...}}]
        #[arg(long)]
        styles: Option<PathBuf>,
        /// Output format (defaults to the config file's, else dot)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Report nodes shared by all inputs and nodes unique to each input
    Compare {
        /// Input files (at least two)
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
        /// Remove versions from node names before comparing
        #[arg(long, default_value_t = false)]
        squash_versions: bool,
        /// Number of leading ':'-separated name components kept when squashing
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        squash_components: Option<u16>,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
