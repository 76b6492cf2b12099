use super::GraphFormatter;
use crate::graph::{is_attribute_name, Attributes, GraphModel, Node};
use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    LR,
    TB,
}

impl RankDir {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RankDir::LR => "LR",
            RankDir::TB => "TB",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DotOptions {
    pub graph_name: String,
    pub rankdir: RankDir,
    pub ranksep: u32,
    pub fontname: String,
    pub fontsize: u32,
    pub node_shape: String,
    pub node_style: String,
    /// Fill used for nodes that carry no `fillcolor` attribute of their own.
    pub fillcolor: String,
    pub bgcolor: String,
    pub arrowhead: String,
    pub arrowtail: String,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            graph_name: "G".into(),
            rankdir: RankDir::LR,
            ranksep: 1,
            fontname: "Helvetica".into(),
            fontsize: 10,
            node_shape: "record".into(),
            node_style: "filled".into(),
            fillcolor: "green".into(),
            bgcolor: "white".into(),
            arrowhead: "normal".into(),
            arrowtail: "none".into(),
        }
    }
}

/// Graphviz DOT output.
#[derive(Debug, Default)]
pub struct DotFormatter {
    opts: DotOptions,
}

impl DotFormatter {
    #[must_use]
    pub fn new(opts: DotOptions) -> Self {
        Self { opts }
    }
}

impl GraphFormatter for DotFormatter {
    fn header(&self, _graph: &GraphModel, out: &mut String) {
        let o = &self.opts;
        let font = escape_label(&o.fontname);
        let _ = writeln!(out, "digraph \"{}\" {{", escape_label(&o.graph_name));
        let _ = writeln!(
            out,
            "edge [fontname=\"{font}\",fontsize={size},labelfontname=\"{font}\",labelfontsize={size}];",
            size = o.fontsize
        );
        let _ = writeln!(
            out,
            "node [fontname=\"{font}\",fontsize={},shape={}, style={}];",
            o.fontsize, o.node_shape, o.node_style
        );
        let _ = writeln!(out, "rankdir={};\nranksep={};\nbgcolor={};", o.rankdir.as_str(), o.ranksep, o.bgcolor);
    }

    fn node(&self, node: &Node, out: &mut String) {
        let mut attrs = Attributes::new();
        attrs.insert("fillcolor".into(), self.opts.fillcolor.clone());
        attrs.extend(node.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        let label = attrs.remove("label").unwrap_or_else(|| node.name.clone());
        let _ = write!(out, "\n  \"{}\" [label=\"{}\"", escape_label(&node.name), escape_label(&label));
        for (k, v) in &attrs {
            let _ = write!(out, ", {}=\"{}\"", attr_key(k), escape_label(v));
        }
        out.push_str("];\n");
    }

    fn edge(&self, source: &str, target: &str, attributes: Option<&Attributes>, out: &mut String) {
        let _ = write!(
            out,
            "\n  \"{}\" -> \"{}\" [arrowhead={},arrowtail={}",
            escape_label(source),
            escape_label(target),
            self.opts.arrowhead,
            self.opts.arrowtail
        );
        for (k, v) in attributes.into_iter().flatten() {
            let _ = write!(out, ", {}=\"{}\"", attr_key(k), escape_label(v));
        }
        out.push_str("];\n");
    }

    fn footer(&self, out: &mut String) {
        out.push_str("}\n");
    }
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// Keys that are not DOT identifiers are written as quoted strings.
fn attr_key(key: &str) -> Cow<'_, str> {
    if is_attribute_name(key) {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(format!("\"{}\"", escape_label(key)))
    }
}
