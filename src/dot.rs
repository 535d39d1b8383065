//! Graphviz DOT serialization of a [`FlowGraph`].
//!
//! This is the whole contract with the layout engine: node ids, labels,
//! shapes and fill colors, then edges with optional captions. No
//! coordinates are emitted; Graphviz lays the graph out itself.

use std::fmt::Write;

use crate::display_width::wrap_label;
use crate::flow_graph::FlowGraph;
use crate::palette::Palette;

pub fn write_dot(graph: &FlowGraph, palette: &Palette, wrap_width: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str("// Process Flow\n");
    out.push_str("digraph {\n");

    for node in &graph.nodes {
        let _ = writeln!(
            out,
            "    {} [label={}, shape={}, style=filled, fillcolor={}];",
            node.id,
            label_text(&node.label, wrap_width),
            node.shape.as_str(),
            quote(palette.fill(node.color)),
        );
    }

    for edge in &graph.edges {
        match &edge.label {
            Some(label) => {
                let _ = writeln!(out, "    {} -> {} [label={}];", edge.from, edge.to, quote(label));
            }
            None => {
                let _ = writeln!(out, "    {} -> {};", edge.from, edge.to);
            }
        }
    }

    out.push_str("}\n");
    out
}

fn label_text(label: &str, wrap_width: Option<usize>) -> String {
    match wrap_width {
        Some(width) if width > 0 => {
            let lines: Vec<String> = wrap_label(label, width).iter().map(|l| escape(l)).collect();
            format!("\"{}\"", lines.join("\\n"))
        }
        _ => quote(label),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorCategory;
    use crate::flow_graph::{DiagramEdge, DiagramNode, NodeShape};
    use pretty_assertions::assert_eq;

    fn node(id: &str, label: &str, shape: NodeShape, color: ColorCategory) -> DiagramNode {
        DiagramNode {
            id: id.to_string(),
            label: label.to_string(),
            shape,
            color,
        }
    }

    #[test]
    fn escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
    }

    #[test]
    fn escape_newlines() {
        assert_eq!(escape("a\nb\r\nc"), "a\\nb\\nc");
    }

    #[test]
    fn empty_graph() {
        let dot = write_dot(&FlowGraph::default(), &Palette::default(), None);
        assert_eq!(dot, "// Process Flow\ndigraph {\n}\n");
    }

    #[test]
    fn nodes_then_edges() {
        let graph = FlowGraph {
            nodes: vec![
                node("node0", "Paid?", NodeShape::Diamond, ColorCategory::Decision),
                node("node1", "Proceed", NodeShape::Rectangle, ColorCategory::Action),
            ],
            edges: vec![DiagramEdge {
                from: "node0".to_string(),
                to: "node1".to_string(),
                label: Some("Yes".to_string()),
            }],
        };
        let dot = write_dot(&graph, &Palette::default(), None);
        let expected = "\
// Process Flow
digraph {
    node0 [label=\"Paid?\", shape=diamond, style=filled, fillcolor=\"khaki\"];
    node1 [label=\"Proceed\", shape=rectangle, style=filled, fillcolor=\"lightblue\"];
    node0 -> node1 [label=\"Yes\"];
}
";
        assert_eq!(dot, expected);
    }

    #[test]
    fn wrapped_label_uses_line_breaks() {
        let graph = FlowGraph {
            nodes: vec![node(
                "node0",
                "Notify applicant of rejection",
                NodeShape::Rectangle,
                ColorCategory::Negative,
            )],
            edges: vec![],
        };
        let dot = write_dot(&graph, &Palette::default(), Some(16));
        assert!(
            dot.contains("label=\"Notify applicant\\nof rejection\""),
            "got: {dot}"
        );
    }

    #[test]
    fn zero_wrap_width_is_ignored() {
        let graph = FlowGraph {
            nodes: vec![node("node0", "A B", NodeShape::Rectangle, ColorCategory::Action)],
            edges: vec![],
        };
        let dot = write_dot(&graph, &Palette::default(), Some(0));
        assert!(dot.contains("label=\"A B\""), "got: {dot}");
    }
}
