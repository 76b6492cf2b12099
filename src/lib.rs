//! adjgraph: render and merge directed graphs described as adjacency records
//!
//! Every input line `SOURCE=TARGET_1,TARGET_2,...` declares a node and its
//! out-edges. Graphs are printed as Graphviz DOT or yEd GraphML.
//!
//! # Features
//! - Depth-first rendering from the roots or a chosen node, optionally hiding the roots
//! - Merging of up to eight graphs with shared/unique node colouring
//! - Maven-style version squashing with conflict marking
//! - Regex-driven node and edge styling from JSON rule files
//!
//! # Quickstart (Library)
//! ```
//! use adjgraph::parser::RecordParser;
//! use adjgraph::visualization::{DotFormatter, TraversalRenderer};
//!
//! let graph = RecordParser::parse_str("app=core,util\ncore=util\n");
//! let dot = TraversalRenderer::default().render(&graph, &DotFormatter::default());
//! assert!(dot.contains("\"app\" -> \"core\""));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! adjgraph render deps.txt -o deps.dot
//! adjgraph merge a.txt b.txt --squash-versions --analyze --format graphml -o merged.graphml
//! adjgraph compare a.txt b.txt --format json
//! ```
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod processor;
pub mod utils;
pub mod visualization;
