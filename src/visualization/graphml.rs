use super::GraphFormatter;
use crate::graph::{Attributes, GraphModel, Node};
use std::fmt::Write as _;

const GRAPHML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xmlns:y="http://www.yworks.com/xml/graphml"
    xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://www.yworks.com/xml/schema/graphml/1.1/ygraphml.xsd">
  <key for="node" id="d1" yfiles.type="nodegraphics"/>
  <graph id="G" edgedefault="directed">
"#;

#[derive(Debug, Clone)]
pub struct GraphmlOptions {
    pub fillcolor: String,
    /// yEd shape type (`rectangle`, `ellipse`, ...).
    pub shape: String,
    pub width: f64,
    pub height: f64,
}

impl Default for GraphmlOptions {
    fn default() -> Self {
        Self { fillcolor: "#FFCC00".into(), shape: "rectangle".into(), width: 60.0, height: 30.0 }
    }
}

/// GraphML output with yEd `ShapeNode` graphics.
#[derive(Debug, Default)]
pub struct GraphmlFormatter {
    opts: GraphmlOptions,
}

impl GraphmlFormatter {
    #[must_use]
    pub fn new(opts: GraphmlOptions) -> Self {
        Self { opts }
    }
}

impl GraphFormatter for GraphmlFormatter {
    fn header(&self, _graph: &GraphModel, out: &mut String) {
        out.push_str(GRAPHML_HEADER);
    }

    fn node(&self, node: &Node, out: &mut String) {
        let id = escape_xml(&node.name);
        let fill = node.attributes.get("fillcolor").unwrap_or(&self.opts.fillcolor);
        let shape = node
            .attributes
            .get("shape")
            .map_or(self.opts.shape.as_str(), |s| yed_shape(s, &self.opts.shape));
        let label = node.attributes.get("label").map_or(id.clone(), |l| escape_xml(l));
        let _ = write!(
            out,
            r##"    <node id="{id}"><data key="d1">
      <y:ShapeNode>
        <y:Shape type="{shape}"/>
        <y:Geometry height="{:.1}" width="{:.1}" x="0.0" y="0.0"/>
        <y:Fill color="{}" transparent="false"/>
        <y:BorderStyle color="#000000" type="line" width="1.0"/>
        <y:NodeLabel>{label}</y:NodeLabel>
      </y:ShapeNode>
    </data></node>
"##,
            self.opts.height,
            self.opts.width,
            escape_xml(fill)
        );
    }

    fn edge(&self, source: &str, target: &str, _attributes: Option<&Attributes>, out: &mut String) {
        let _ = writeln!(out, r#"    <edge source="{}" target="{}"/>"#, escape_xml(source), escape_xml(target));
    }

    fn footer(&self, out: &mut String) {
        out.push_str("  </graph>\n</graphml>\n");
    }
}

// Map a Graphviz shape name onto the closest yEd shape type.
fn yed_shape<'a>(dot_shape: &str, fallback: &'a str) -> &'a str {
    match dot_shape {
        "box" | "rect" | "rectangle" | "record" | "square" => "rectangle",
        "ellipse" | "oval" | "circle" | "doublecircle" => "ellipse",
        "octagon" | "doubleoctagon" | "tripleoctagon" => "octagon",
        "hexagon" => "hexagon",
        "diamond" => "diamond",
        "triangle" => "triangle",
        "parallelogram" => "parallelogram",
        "trapezium" => "trapezoid",
        _ => fallback,
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RecordParser;
    use crate::visualization::{RenderOptions, TraversalRenderer};

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn yed_shape_mapping() {
        assert_eq!(yed_shape("tripleoctagon", "rectangle"), "octagon");
        assert_eq!(yed_shape("record", "ellipse"), "rectangle");
        assert_eq!(yed_shape("star", "rectangle"), "rectangle");
    }

    #[test]
    fn conflict_attributes_reach_the_shape_node() {
        let mut g = GraphModel::new();
        let n = g.get_or_create_node("x");
        n.attributes.insert("fillcolor".into(), "#ffffff".into());
        n.attributes.insert("shape".into(), "tripleoctagon".into());
        let mut s = String::new();
        GraphmlFormatter::default().node(g.find_node("x").unwrap(), &mut s);
        assert!(s.contains(r#"<y:Shape type="octagon"/>"#));
        assert!(s.contains(r##"<y:Fill color="#ffffff" transparent="false"/>"##));
        assert!(s.contains(r#"<y:Geometry height="30.0" width="60.0""#));
    }

    #[test]
    fn render_document_structure() {
        let g = RecordParser::parse_str("A=B,C\nB=C\n");
        let s = TraversalRenderer::new(RenderOptions::default()).render(&g, &GraphmlFormatter::default());
        assert!(s.starts_with("<?xml"));
        assert_eq!(s.matches("<node id=").count(), 3);
        assert_eq!(s.matches("<edge ").count(), 3);
        assert!(s.contains(r#"<edge source="B" target="C"/>"#));
        assert!(s.ends_with("</graphml>\n"));
    }
}
