use super::palette::HIGHLIGHT_COLOR;
use super::EdgeRule;
use crate::errors::GraphError;
use crate::graph::{is_attribute_name, Attributes, Edge, GraphModel};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// JSON form of a style rule:
///
/// ```json
/// [
///   {"pattern": "^.*site2.keyword.*$", "attributes": {"fillcolor": "#ff0000", "style": "filled"}},
///   {"pattern": "org\\.slf4j:.*", "attributes": {"shape": "box"}, "edge_attributes": {"color": "grey"}}
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StyleRuleSpec {
    pub pattern: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub edge_attributes: Attributes,
}

#[derive(Debug, Clone)]
enum Matcher {
    All,
    Pattern(Regex),
}

/// Copies attributes onto every node whose name fully matches a pattern.
///
/// Applied per edge: both endpoints are tested; `edge_attributes` are copied onto
/// the edge itself when both endpoints match.
#[derive(Debug, Clone)]
pub struct StyleRule {
    matcher: Matcher,
    attributes: Attributes,
    edge_attributes: Attributes,
}

impl StyleRule {
    /// Build a rule whose `pattern` must match a whole node name.
    ///
    /// # Errors
    /// Returns `GraphError::InvalidPattern` if `pattern` is not a valid regular expression
    /// and `GraphError::InvalidAttribute` for an attribute key that is not an identifier.
    pub fn new(pattern: &str, attributes: Attributes) -> Result<Self, GraphError> {
        check_keys(&attributes)?;
        let anchored = format!("^(?:{pattern})$");
        let re = Regex::new(&anchored)
            .map_err(|source| GraphError::InvalidPattern { pattern: pattern.to_string(), source })?;
        Ok(Self { matcher: Matcher::Pattern(re), attributes, edge_attributes: Attributes::new() })
    }

    /// A rule matching every node.
    #[must_use]
    pub fn global(attributes: Attributes) -> Self {
        Self { matcher: Matcher::All, attributes, edge_attributes: Attributes::new() }
    }

    /// Filled highlight colour for every node matching `pattern`.
    ///
    /// # Errors
    /// Returns `GraphError::InvalidPattern` if `pattern` does not compile.
    pub fn highlight(pattern: &str) -> Result<Self, GraphError> {
        Self::new(pattern, filled(HIGHLIGHT_COLOR))
    }

    #[must_use]
    pub fn with_edge_attributes(mut self, edge_attributes: Attributes) -> Self {
        self.edge_attributes = edge_attributes;
        self
    }

    /// Parse a JSON array of `StyleRuleSpec`s, compiling every pattern up front.
    ///
    /// # Errors
    /// Returns `GraphError::StyleRules` for malformed JSON,
    /// `GraphError::InvalidPattern` for a pattern that does not compile and
    /// `GraphError::InvalidAttribute` for a key that is not an identifier.
    pub fn from_json(json: &str) -> Result<Vec<Self>, GraphError> {
        let specs: Vec<StyleRuleSpec> = serde_json::from_str(json)?;
        specs
            .into_iter()
            .map(|s| -> Result<Self, GraphError> {
                check_keys(&s.edge_attributes)?;
                Ok(Self::new(&s.pattern, s.attributes)?.with_edge_attributes(s.edge_attributes))
            })
            .collect()
    }

    /// # Errors
    /// Returns `GraphError::Read` if the file cannot be read, otherwise as `from_json`.
    pub fn from_json_file(path: &Path) -> Result<Vec<Self>, GraphError> {
        let data = std::fs::read_to_string(path)
            .map_err(|source| GraphError::Read { file: path.to_path_buf(), source })?;
        Self::from_json(&data)
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Pattern(re) => re.is_match(name),
        }
    }

    /// Copy this rule's attributes onto the node `name` if it matches.
    ///
    /// Existing values for the same keys are overwritten; other keys are left alone.
    pub fn apply_node(&self, graph: &mut GraphModel, name: &str) -> bool {
        if !self.matches(name) {
            return false;
        }
        let node = graph.get_or_create_node(name);
        for (k, v) in &self.attributes {
            node.attributes.insert(k.clone(), v.clone());
        }
        true
    }
}

impl EdgeRule for StyleRule {
    fn apply(&self, graph: &mut GraphModel, edge: &Edge) {
        let source_hit = self.apply_node(graph, &edge.source);
        let target_hit = self.apply_node(graph, &edge.target);
        if source_hit && target_hit && !self.edge_attributes.is_empty() {
            for e in graph.edges_between_mut(&edge.source, &edge.target) {
                for (k, v) in &self.edge_attributes {
                    e.attributes.insert(k.clone(), v.clone());
                }
            }
        }
    }

    /// Styles every edge-touched node and then every edge in a single sweep.
    fn apply_all(&self, graph: &mut GraphModel) {
        let mut hits: HashMap<String, bool> = HashMap::new();
        for edge in graph.edges() {
            for name in [&edge.source, &edge.target] {
                if !hits.contains_key(name) {
                    hits.insert(name.clone(), self.matches(name));
                }
            }
        }
        for (name, _) in hits.iter().filter(|(_, hit)| **hit) {
            if let Some(node) = graph.find_node_mut(name) {
                for (k, v) in &self.attributes {
                    node.attributes.insert(k.clone(), v.clone());
                }
            }
        }
        if self.edge_attributes.is_empty() {
            return;
        }
        let hit = |name: &str| hits.get(name).copied().unwrap_or(false);
        for e in graph.edges_mut().filter(|e| hit(&e.source) && hit(&e.target)) {
            for (k, v) in &self.edge_attributes {
                e.attributes.insert(k.clone(), v.clone());
            }
        }
    }
}

fn check_keys(attributes: &Attributes) -> Result<(), GraphError> {
    match attributes.keys().find(|k| !is_attribute_name(k)) {
        Some(key) => Err(GraphError::InvalidAttribute { key: key.clone() }),
        None => Ok(()),
    }
}

/// `{fillcolor: color, style: filled}`
#[must_use]
pub fn filled(color: &str) -> Attributes {
    Attributes::from([("fillcolor".to_string(), color.to_string()), ("style".to_string(), "filled".to_string())])
}
