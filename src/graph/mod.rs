//! Graph model for the crate.
//!
//! A `GraphModel` holds named `Node`s (one per distinct name), their ordered
//! in/out adjacency and the list of `Edge`s in insertion order. Every edge is
//! created through `GraphModel::get_or_create_node`, which is the single point
//! of node deduplication.
//!
//! You typically construct a graph via `crate::parser::RecordParser` and then
//! pass it to `crate::visualization` or `crate::processor`.
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Style attributes attached to nodes and edges (e.g. `fillcolor`, `shape`).
///
/// Ordered so that rendered output is deterministic.
pub type Attributes = BTreeMap<String, String>;

/// True if `key` can name an attribute: an ASCII letter or `_` followed by
/// letters, digits or `_`.
#[must_use]
pub fn is_attribute_name(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    /// Targets of outgoing edges, in insertion order. Duplicates are kept.
    pub out_edges: Vec<String>,
    /// Sources of incoming edges, in insertion order. Duplicates are kept.
    pub in_edges: Vec<String>,
    pub attributes: Attributes,
    // Original (versioned) names absorbed by version squashing. Never rendered.
    versions: BTreeSet<String>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    /// True when nothing points at this node.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.in_edges.is_empty()
    }

    #[must_use]
    pub fn has_edges(&self) -> bool {
        !self.in_edges.is_empty() || !self.out_edges.is_empty()
    }

    /// Original names collected for this node by version squashing.
    #[must_use]
    pub fn versions(&self) -> &BTreeSet<String> {
        &self.versions
    }

    pub(crate) fn record_version(&mut self, original: &str) {
        self.versions.insert(original.to_string());
    }

    pub(crate) fn absorb_versions(&mut self, other: &BTreeSet<String>) {
        self.versions.extend(other.iter().cloned());
    }

    pub(crate) fn take_versions(&mut self) -> BTreeSet<String> {
        std::mem::take(&mut self.versions)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub attributes: Attributes,
}

impl Edge {
    #[must_use]
    pub fn new(source: &str, target: &str) -> Self {
        Self { source: source.to_string(), target: target.to_string(), attributes: Attributes::new() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    /// Identifies the graph among several inputs (usually the input path).
    pub name: String,
    nodes: HashMap<String, Node>,
    // Node names in creation order; drives root detection and merge iteration.
    order: Vec<String>,
    edges: Vec<Edge>,
}

impl GraphModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Return the node called `name`, creating and registering it first if needed.
    pub fn get_or_create_node(&mut self, name: &str) -> &mut Node {
        match self.nodes.entry(name.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.order.push(name.to_string());
                e.insert(Node::new(name))
            }
        }
    }

    /// Add a directed edge `source -> target`, creating both endpoints as needed.
    ///
    /// Self-loops are dropped (the node is still registered) and `None` is returned.
    /// Repeating an edge appends a parallel edge.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Option<&mut Edge> {
        self.get_or_create_node(source);
        self.get_or_create_node(target);
        if source == target {
            return None;
        }
        if let Some(src) = self.nodes.get_mut(source) {
            src.out_edges.push(target.to_string());
        }
        if let Some(dst) = self.nodes.get_mut(target) {
            dst.in_edges.push(source.to_string());
        }
        self.edges.push(Edge::new(source, target));
        self.edges.last_mut()
    }

    /// Add a copy of `edge` (attributes included), creating its endpoints as needed.
    ///
    /// Returns false when the edge is a self-loop and was dropped.
    pub fn merge_edge_into(&mut self, edge: &Edge) -> bool {
        match self.add_edge(&edge.source, &edge.target) {
            Some(added) => {
                added.attributes.clone_from(&edge.attributes);
                true
            }
            None => false,
        }
    }

    /// Remove one `source -> target` edge (the earliest added), if present.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> Option<Edge> {
        let pos = self.edges.iter().position(|e| e.source == source && e.target == target)?;
        let removed = self.edges.remove(pos);
        if let Some(src) = self.nodes.get_mut(source) {
            remove_first(&mut src.out_edges, target);
        }
        if let Some(dst) = self.nodes.get_mut(target) {
            remove_first(&mut dst.in_edges, source);
        }
        Some(removed)
    }

    /// Remove the node called `name` if no edge touches it.
    pub fn remove_isolated_node(&mut self, name: &str) -> bool {
        let isolated = self.nodes.get(name).is_some_and(|n| !n.has_edges());
        if isolated {
            self.nodes.remove(name);
            self.order.retain(|n| n != name);
        }
        isolated
    }

    /// Remove every node in `names` that no edge touches, in one pass over the graph.
    /// Returns how many nodes were removed.
    pub fn remove_isolated_nodes(&mut self, names: &HashSet<String>) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|name, node| !names.contains(name) || node.has_edges());
        if self.nodes.len() != before {
            let nodes = &self.nodes;
            self.order.retain(|n| nodes.contains_key(n));
        }
        before - self.nodes.len()
    }

    /// Swap in a whole new edge list and rebuild every node's adjacency from it.
    ///
    /// Endpoints are created as needed and self-loops are dropped, as in `add_edge`.
    pub fn replace_edges(&mut self, edges: Vec<Edge>) {
        for node in self.nodes.values_mut() {
            node.out_edges.clear();
            node.in_edges.clear();
        }
        self.edges = Vec::with_capacity(edges.len());
        for edge in edges {
            self.get_or_create_node(&edge.source);
            self.get_or_create_node(&edge.target);
            if edge.source == edge.target {
                continue;
            }
            if let Some(src) = self.nodes.get_mut(&edge.source) {
                src.out_edges.push(edge.target.clone());
            }
            if let Some(dst) = self.nodes.get_mut(&edge.target) {
                dst.in_edges.push(edge.source.clone());
            }
            self.edges.push(edge);
        }
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn find_node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    /// Nodes without incoming edges, in creation order.
    #[must_use]
    pub fn roots(&self) -> Vec<&Node> {
        self.nodes().filter(|n| n.is_root()).collect()
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }

    /// All nodes, in no particular order.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    /// Every parallel `source -> target` edge.
    pub fn edges_between_mut<'a>(
        &'a mut self,
        source: &'a str,
        target: &'a str,
    ) -> impl Iterator<Item = &'a mut Edge> + 'a {
        self.edges.iter_mut().filter(move |e| e.source == source && e.target == target)
    }

    /// Names of every node that is the source or target of at least one edge.
    #[must_use]
    pub fn touched_nodes(&self) -> BTreeSet<String> {
        self.edges.iter().flat_map(|e| [e.source.clone(), e.target.clone()]).collect()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn remove_first(list: &mut Vec<String>, name: &str) {
    if let Some(pos) = list.iter().position(|n| n == name) {
        list.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn get_or_create_dedups_by_name() {
        let mut g = GraphModel::new();
        g.get_or_create_node("a").attributes.insert("k".into(), "v".into());
        g.get_or_create_node("b");
        let again = g.get_or_create_node("a");
        assert_eq!(again.attributes.get("k").map(String::as_str), Some("v"));
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn self_loop_registers_node_without_edges() {
        let mut g = GraphModel::new();
        assert!(g.add_edge("a", "a").is_none());
        let a = g.find_node("a").unwrap();
        assert!(a.out_edges.is_empty());
        assert!(a.in_edges.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let mut g = GraphModel::new();
        g.add_edge("a", "b");
        g.add_edge("a", "b");
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.find_node("a").unwrap().out_edges, vec!["b", "b"]);
        assert_eq!(g.find_node("b").unwrap().in_edges, vec!["a", "a"]);
    }

    #[test]
    fn roots_follow_creation_order() {
        let mut g = GraphModel::new();
        g.add_edge("z", "c");
        g.get_or_create_node("lonely");
        g.add_edge("a", "c");
        assert_eq!(names(&g.roots()), vec!["z", "lonely", "a"]);
    }

    #[test]
    fn remove_edge_removes_one_instance() {
        let mut g = GraphModel::new();
        g.add_edge("a", "b");
        g.add_edge("a", "b");
        let removed = g.remove_edge("a", "b").unwrap();
        assert_eq!(removed.target, "b");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.find_node("a").unwrap().out_edges, vec!["b"]);
        assert!(g.remove_edge("b", "a").is_none());
    }

    #[test]
    fn merge_edge_into_copies_attributes_and_creates_nodes() {
        let mut g = GraphModel::new();
        let mut e = Edge::new("x", "y");
        e.attributes.insert("color".into(), "red".into());
        assert!(g.merge_edge_into(&e));
        assert_eq!(g.edges()[0].attributes.get("color").map(String::as_str), Some("red"));
        assert!(g.find_node("x").is_some() && g.find_node("y").is_some());
        assert!(!g.merge_edge_into(&Edge::new("x", "x")));
    }

    #[test]
    fn remove_isolated_node_keeps_connected_nodes() {
        let mut g = GraphModel::new();
        g.add_edge("a", "b");
        g.get_or_create_node("c");
        assert!(!g.remove_isolated_node("a"));
        assert!(g.remove_isolated_node("c"));
        assert!(g.find_node("c").is_none());
        assert_eq!(g.nodes().count(), 2);
    }

    #[test]
    fn touched_nodes_ignores_isolated() {
        let mut g = GraphModel::new();
        g.add_edge("a", "b");
        g.get_or_create_node("c");
        let touched: Vec<_> = g.touched_nodes().into_iter().collect();
        assert_eq!(touched, vec!["a", "b"]);
    }

    #[test]
    fn versions_accumulate_as_a_set() {
        let mut n = Node::new("g:a");
        n.record_version("g:a:1");
        n.record_version("g:a:1");
        n.absorb_versions(&BTreeSet::from(["g:a:2".to_string()]));
        assert_eq!(n.versions().len(), 2);
        assert_eq!(n.take_versions().len(), 2);
        assert!(n.versions().is_empty());
    }

    #[test]
    fn replace_edges_rebuilds_adjacency() {
        let mut g = GraphModel::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        let mut styled = Edge::new("c", "a");
        styled.attributes.insert("color".into(), "red".into());
        g.replace_edges(vec![Edge::new("a", "c"), styled, Edge::new("d", "d")]);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.find_node("a").unwrap().out_edges, vec!["c"]);
        assert_eq!(g.find_node("a").unwrap().in_edges, vec!["c"]);
        assert!(!g.find_node("b").unwrap().has_edges());
        assert!(!g.find_node("d").unwrap().has_edges());
        assert_eq!(g.edges()[1].attributes.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn remove_isolated_nodes_only_touches_named_candidates() {
        let mut g = GraphModel::new();
        g.add_edge("a", "b");
        g.get_or_create_node("c");
        g.get_or_create_node("d");
        let candidates: HashSet<String> = ["a", "c"].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(g.remove_isolated_nodes(&candidates), 1);
        assert!(g.find_node("c").is_none());
        let order: Vec<&str> = g.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "d"]);
    }

    #[test]
    fn attribute_names_are_plain_identifiers() {
        assert!(is_attribute_name("fillcolor"));
        assert!(is_attribute_name("_x1"));
        assert!(!is_attribute_name(""));
        assert!(!is_attribute_name("1st"));
        assert!(!is_attribute_name("fill color"));
        assert!(!is_attribute_name("a\"];evil"));
    }
}
