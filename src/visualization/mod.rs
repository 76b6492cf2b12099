//! Rendering of a `GraphModel` into text formats.
//!
//! `TraversalRenderer` walks the graph depth-first from its entry nodes and hands
//! every first-visited node and every traversed edge to a `GraphFormatter`.
//! Two formatters are provided: `DotFormatter` (Graphviz) and `GraphmlFormatter`
//! (yEd flavoured GraphML).
use crate::graph::{Attributes, GraphModel, Node};
use std::collections::HashSet;

pub mod dot;
pub mod graphml;

pub use dot::{DotFormatter, DotOptions, RankDir};
pub use graphml::{GraphmlFormatter, GraphmlOptions};

/// Output strategy shared by the traversal and flat renderers.
pub trait GraphFormatter {
    fn header(&self, graph: &GraphModel, out: &mut String);
    fn node(&self, node: &Node, out: &mut String);
    fn edge(&self, source: &str, target: &str, attributes: Option<&Attributes>, out: &mut String);
    fn footer(&self, out: &mut String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Dot,
    Graphml,
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Render only what is reachable from this node instead of from every root.
    pub root: Option<String>,
    /// Hide the entry nodes and their direct edges, keeping everything below them.
    pub suppress_roots: bool,
}

#[derive(Debug, Default)]
pub struct TraversalRenderer {
    options: RenderOptions,
}

impl TraversalRenderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Entry set for a pass: the explicit root if configured (possibly none), else every root.
    #[must_use]
    pub fn entry_nodes<'g>(&self, graph: &'g GraphModel) -> Vec<&'g Node> {
        match self.options.root.as_deref() {
            Some(name) => {
                let found: Vec<&Node> = graph.find_node(name).into_iter().collect();
                if found.is_empty() {
                    tracing::warn!(root = name, "root node not found; nothing to render");
                }
                found
            }
            None => graph.roots(),
        }
    }

    /// Depth-first, pre-order rendering from the entry nodes.
    ///
    /// Each node is written at most once per call; every traversed edge is written,
    /// including edges into nodes already written through another path.
    #[must_use]
    pub fn render(&self, graph: &GraphModel, formatter: &dyn GraphFormatter) -> String {
        let mut out = String::new();
        formatter.header(graph, &mut out);
        let mut visited: HashSet<&str> = HashSet::new();
        let entries = self.entry_nodes(graph);
        tracing::debug!(entries = entries.len(), suppress_roots = self.options.suppress_roots, "rendering graph");
        for entry in entries {
            visit(graph, entry, self.options.suppress_roots, &mut visited, formatter, &mut out);
        }
        formatter.footer(&mut out);
        out
    }

    /// Write every node in creation order, then every edge with its attributes.
    #[must_use]
    pub fn render_flat(graph: &GraphModel, formatter: &dyn GraphFormatter) -> String {
        let mut out = String::new();
        formatter.header(graph, &mut out);
        for node in graph.nodes() {
            formatter.node(node, &mut out);
        }
        for edge in graph.edges() {
            formatter.edge(&edge.source, &edge.target, Some(&edge.attributes), &mut out);
        }
        formatter.footer(&mut out);
        out
    }
}

fn visit<'g>(
    graph: &'g GraphModel,
    node: &'g Node,
    skip: bool,
    visited: &mut HashSet<&'g str>,
    formatter: &dyn GraphFormatter,
    out: &mut String,
) {
    if !visited.insert(node.name.as_str()) {
        return;
    }
    if !skip {
        formatter.node(node, out);
    }
    for target in &node.out_edges {
        if let Some(child) = graph.find_node(target) {
            visit(graph, child, false, visited, formatter, out);
        }
        // a skipped node hides its own edges too
        if !skip {
            formatter.edge(&node.name, target, None, out);
        }
    }
}
