//! Multi-graph processing: version squashing, merging, set algebra and styling.
//!
//! `GraphProcessor::process` runs the full pipeline for several independently
//! parsed graphs:
//! 1. optionally squash versions out of every node name (`squash`),
//! 2. merge all graphs, unioning the absorbed version sets,
//! 3. optionally colour shared and graph-unique nodes (`palette`),
//! 4. mark version conflicts,
//! 5. apply the configured style rules in order (`style`).
use crate::errors::GraphError;
use crate::graph::{Edge, GraphModel};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub mod palette;
pub mod squash;
pub mod style;

pub use squash::{clean_version_tag, squash_versions, VersionSquash};
pub use style::{filled, StyleRule, StyleRuleSpec};

/// A rewrite or styling step applied once per edge.
pub trait EdgeRule {
    fn apply(&self, graph: &mut GraphModel, edge: &Edge);

    /// Apply to every edge present when the call starts, in insertion order.
    fn apply_all(&self, graph: &mut GraphModel) {
        let snapshot = graph.edges().to_vec();
        for edge in &snapshot {
            self.apply(graph, edge);
        }
    }
}

/// Union of all `graphs`. Parallel edges are kept, node attributes from the
/// first graph defining a key win, and absorbed version sets are unioned.
#[must_use]
pub fn merge_graphs(graphs: &[GraphModel]) -> GraphModel {
    let mut merged = GraphModel::named("merged");
    for g in graphs {
        for e in g.edges() {
            merged.merge_edge_into(e);
        }
        for n in g.nodes() {
            let m = merged.get_or_create_node(&n.name);
            for (k, v) in &n.attributes {
                m.attributes.entry(k.clone()).or_insert_with(|| v.clone());
            }
            m.absorb_versions(n.versions());
        }
    }
    tracing::info!(
        inputs = graphs.len(),
        nodes = merged.node_count(),
        edges = merged.edge_count(),
        "merged graphs"
    );
    merged
}

/// Per-graph sets of edge-touched node names, and their intersection.
#[must_use]
pub fn intersecting_nodes(graphs: &[GraphModel]) -> (Vec<BTreeSet<String>>, BTreeSet<String>) {
    let node_sets: Vec<BTreeSet<String>> = graphs.iter().map(GraphModel::touched_nodes).collect();
    let intersection = match node_sets.split_first() {
        Some((first, rest)) => rest
            .iter()
            .fold(first.clone(), |acc, s| acc.intersection(s).cloned().collect()),
        None => BTreeSet::new(),
    };
    (node_sets, intersection)
}

/// For each graph, the nodes found in no other graph.
///
/// `node_sets` must be the per-graph sets from `intersecting_nodes`, in the same order.
#[must_use]
pub fn non_intersecting_nodes_per_graph(
    graphs: &[GraphModel],
    node_sets: &[BTreeSet<String>],
) -> BTreeMap<String, BTreeSet<String>> {
    graphs
        .iter()
        .zip(node_sets)
        .enumerate()
        .map(|(i, (g, own))| {
            let unique = own
                .iter()
                .filter(|name| {
                    !node_sets.iter().enumerate().any(|(j, other)| j != i && other.contains(*name))
                })
                .cloned()
                .collect();
            (g.name.clone(), unique)
        })
        .collect()
}

/// Shared and graph-unique nodes across several inputs.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub graphs: Vec<String>,
    pub intersection: BTreeSet<String>,
    pub unique: BTreeMap<String, BTreeSet<String>>,
}

#[must_use]
pub fn compare_graphs(graphs: &[GraphModel]) -> Comparison {
    let (node_sets, intersection) = intersecting_nodes(graphs);
    let unique = non_intersecting_nodes_per_graph(graphs, &node_sets);
    Comparison { graphs: graphs.iter().map(|g| g.name.clone()).collect(), intersection, unique }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    pub squash_versions: bool,
    pub analyze: bool,
    pub squash: VersionSquash,
}

impl ProcessOptions {
    /// Reject option/input combinations that cannot be processed.
    ///
    /// # Errors
    /// `NoInputs` for zero inputs, `TooManyInputs` beyond the palette size and
    /// `TooFewInputs` when squashing or analysis is requested for a single input.
    pub fn validate(&self, input_count: usize) -> Result<(), GraphError> {
        if input_count == 0 {
            return Err(GraphError::NoInputs);
        }
        let max = palette::maximum_input_graphs();
        if input_count > max {
            return Err(GraphError::TooManyInputs { count: input_count, max });
        }
        if input_count < 2 && self.squash_versions {
            return Err(GraphError::TooFewInputs { flag: "--squash-versions" });
        }
        if input_count < 2 && self.analyze {
            return Err(GraphError::TooFewInputs { flag: "--analyze" });
        }
        Ok(())
    }
}

/// Runs the merge pipeline with an ordered list of style rules.
#[derive(Debug, Default)]
pub struct GraphProcessor {
    pub style_rules: Vec<StyleRule>,
}

impl GraphProcessor {
    #[must_use]
    pub fn new(style_rules: Vec<StyleRule>) -> Self {
        Self { style_rules }
    }

    /// Combine `graphs` into one styled graph.
    ///
    /// With a single input the graph is only styled.
    ///
    /// # Errors
    /// Returns a configuration error (see `ProcessOptions::validate`) or
    /// `GraphError::DuplicateGraph` before any graph is touched.
    pub fn process(&self, graphs: Vec<GraphModel>, opts: &ProcessOptions) -> Result<GraphModel, GraphError> {
        opts.validate(graphs.len())?;
        check_unique_names(&graphs)?;
        let names: Vec<String> = graphs.iter().map(|g| g.name.clone()).collect();
        let colors = palette::assign_colors(&names)?;

        let mut graphs = graphs;
        let mut final_graph = if graphs.len() > 1 {
            if opts.squash_versions {
                for g in &mut graphs {
                    squash_versions(g, &opts.squash);
                }
            }
            let mut merged = merge_graphs(&graphs);
            if opts.analyze {
                color_by_membership(&mut merged, &graphs, &colors);
            }
            merged
        } else {
            graphs.pop().ok_or(GraphError::NoInputs)?
        };

        if opts.squash_versions {
            let conflicts = final_graph.nodes_mut().map(clean_version_tag).filter(|c| *c).count();
            tracing::info!(conflicts, "checked version conflicts");
        }

        for rule in &self.style_rules {
            rule.apply_all(&mut final_graph);
        }
        tracing::debug!(rules = self.style_rules.len(), "applied style rules");
        Ok(final_graph)
    }
}

fn check_unique_names(graphs: &[GraphModel]) -> Result<(), GraphError> {
    let mut seen = HashSet::new();
    match graphs.iter().find(|g| !seen.insert(g.name.as_str())) {
        Some(dup) => Err(GraphError::DuplicateGraph(dup.name.clone())),
        None => Ok(()),
    }
}

// Shared nodes get the intersection colour, graph-unique nodes their graph's colour.
fn color_by_membership(merged: &mut GraphModel, graphs: &[GraphModel], colors: &BTreeMap<String, &'static str>) {
    let (node_sets, intersection) = intersecting_nodes(graphs);
    let shared = StyleRule::global(filled(palette::INTERSECT_COLOR));
    for name in &intersection {
        shared.apply_node(merged, name);
    }
    let unique = non_intersecting_nodes_per_graph(graphs, &node_sets);
    for g in graphs {
        let (Some(color), Some(nodes)) = (colors.get(&g.name), unique.get(&g.name)) else {
            continue;
        };
        let rule = StyleRule::global(filled(color));
        for name in nodes {
            rule.apply_node(merged, name);
        }
    }
    tracing::info!(shared = intersection.len(), "coloured shared and unique nodes");
}
