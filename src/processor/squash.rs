use super::palette::{CONFLICT_COLOR, CONFLICT_SHAPE};
use super::EdgeRule;
use crate::graph::{Edge, GraphModel, Node};
use std::collections::HashSet;

/// Maven coordinates are `group:artifact:type:version[:scope]`; the first
/// three components identify a dependency independently of its version.
pub const MVN_VERSION_POSITION: usize = 3;
pub const MVN_DELIMITER: char = ':';

/// Rewrites every edge to connect version-stripped node names.
///
/// The stripped target remembers each original name it absorbed so that a
/// later `clean_version_tag` can flag nodes seen with several versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSquash {
    pub delimiter: char,
    /// Number of leading components kept.
    pub components: usize,
}

impl Default for VersionSquash {
    fn default() -> Self {
        Self { delimiter: MVN_DELIMITER, components: MVN_VERSION_POSITION }
    }
}

impl VersionSquash {
    #[must_use]
    pub fn squash_name(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for (i, part) in name.split(self.delimiter).take(self.components).enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            out.push_str(part);
        }
        out
    }
}

impl EdgeRule for VersionSquash {
    fn apply(&self, graph: &mut GraphModel, edge: &Edge) {
        let source = self.squash_name(&edge.source);
        let target = self.squash_name(&edge.target);
        if source == edge.source && target == edge.target {
            return;
        }
        if target != edge.target {
            graph.get_or_create_node(&target).record_version(&edge.target);
        }
        let Some(mut moved) = graph.remove_edge(&edge.source, &edge.target) else {
            return;
        };
        moved.source = source;
        moved.target = target;
        graph.merge_edge_into(&moved);
        // versioned names that lost their last edge disappear with it
        for original in [&edge.source, &edge.target] {
            if *original != moved.source && *original != moved.target {
                graph.remove_isolated_node(original);
            }
        }
    }

    /// Rewrites the whole edge list in one pass, then prunes emptied originals once.
    fn apply_all(&self, graph: &mut GraphModel) {
        let mut orphans = HashSet::new();
        let mut versions = Vec::new();
        let mut edges = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            let source = self.squash_name(&edge.source);
            let target = self.squash_name(&edge.target);
            if source == edge.source && target == edge.target {
                edges.push(edge.clone());
                continue;
            }
            for original in [&edge.source, &edge.target] {
                if *original != source && *original != target {
                    orphans.insert(original.clone());
                }
            }
            if target != edge.target {
                versions.push((target.clone(), edge.target.clone()));
            }
            edges.push(Edge { source, target, attributes: edge.attributes.clone() });
        }
        for (squashed, original) in &versions {
            graph.get_or_create_node(squashed).record_version(original);
        }
        graph.replace_edges(edges);
        graph.remove_isolated_nodes(&orphans);
    }
}

/// Squash every edge of `graph` in place. Returns the number of edges after squashing.
pub fn squash_versions(graph: &mut GraphModel, squash: &VersionSquash) -> usize {
    let before = graph.node_count();
    squash.apply_all(graph);
    tracing::debug!(
        graph = %graph.name,
        nodes_before = before,
        nodes_after = graph.node_count(),
        "squashed versions"
    );
    graph.edge_count()
}

/// Drop the version bookkeeping of `node`, marking it as a conflict when it
/// absorbed more than one original name. Returns true for conflicts.
///
/// Conflict nodes get the conflict shape; if nothing styled them yet they also
/// get the default conflict fill.
pub fn clean_version_tag(node: &mut Node) -> bool {
    let versions = node.take_versions();
    if versions.len() <= 1 {
        return false;
    }
    tracing::info!(node = %node.name, ?versions, "version conflict");
    node.attributes.insert("shape".into(), CONFLICT_SHAPE.into());
    if !node.attributes.contains_key("style") {
        node.attributes.insert("style".into(), "filled".into());
        node.attributes.insert("fillcolor".into(), CONFLICT_COLOR.into());
    }
    true
}
