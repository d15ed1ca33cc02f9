use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::course::{Course, CourseId};
use crate::graph::{CourseGraph, DroppedEdge, Edge};
use crate::render::style::{EdgeStyle, NodeStyle, StyleOverrides};

pub fn render_tree(graph: &CourseGraph, roots: &[CourseId]) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&node_label(graph, root));
        out.push('\n');
        let mut path = vec![root.clone()];
        render_tree_children(graph, root, "", &mut path, &mut out);
    }
    out
}

pub fn render_flat(graph: &CourseGraph, roots: &[CourseId]) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&node_label(graph, root));
        out.push('\n');
        let mut path = vec![root.clone()];
        render_flat_children(graph, root, 1, &mut path, &mut out);
    }
    out
}

/// Graphviz output. Nodes of the same year share a rank; `overrides`
/// colours the focus lineage and hides unrelated edges.
pub fn render_dot(graph: &CourseGraph, overrides: Option<&StyleOverrides>) -> String {
    let mut out = String::from("digraph coursegraph {\n  rankdir=TB;\n");

    let mut years: BTreeMap<u8, Vec<&CourseId>> = BTreeMap::new();
    for node in graph.nodes() {
        years.entry(node.course.year).or_default().push(&node.id);

        let mut attrs = vec![format!(
            "label=\"{}\"",
            escape_dot_label(&node.course.title)
        )];
        if node.course.optional {
            attrs.push("style=dashed".to_string());
        }
        if let Some(overrides) = overrides {
            if let Some(style) = node_style_attrs(overrides.node(&node.id)) {
                attrs.push(style.to_string());
            }
        }
        out.push_str(&format!(
            "  \"{}\" [{}];\n",
            escape_dot_label(node.id.as_str()),
            attrs.join(", ")
        ));
    }

    for (year, ids) in &years {
        let members = ids
            .iter()
            .map(|id| format!("\"{}\";", escape_dot_label(id.as_str())))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("  {{ rank=same; /* year {year} */ {members} }}\n"));
    }

    for edge in graph.edges() {
        let style = overrides
            .map(|overrides| overrides.edge(edge))
            .and_then(edge_style_attrs);
        match style {
            Some(attrs) => out.push_str(&format!(
                "  \"{}\" -> \"{}\" [{}];\n",
                escape_dot_label(edge.from.as_str()),
                escape_dot_label(edge.to.as_str()),
                attrs
            )),
            None => out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape_dot_label(edge.from.as_str()),
                escape_dot_label(edge.to.as_str())
            )),
        }
    }
    out.push_str("}\n");
    out
}

#[derive(Debug, Serialize)]
pub struct GraphJson<'a> {
    pub nodes: Vec<NodeJson<'a>>,
    pub edges: &'a [Edge],
    pub dropped: &'a [DroppedEdge],
}

#[derive(Debug, Serialize)]
pub struct NodeJson<'a> {
    pub id: &'a CourseId,
    pub label: &'a str,
    pub members: &'a [CourseId],
    pub course: &'a Course,
}

pub fn to_json(graph: &CourseGraph) -> GraphJson<'_> {
    GraphJson {
        nodes: graph
            .nodes()
            .iter()
            .map(|node| NodeJson {
                id: &node.id,
                label: &node.course.title,
                members: &node.members,
                course: &node.course,
            })
            .collect(),
        edges: graph.edges(),
        dropped: graph.dropped(),
    }
}

fn node_style_attrs(style: NodeStyle) -> Option<&'static str> {
    match style {
        NodeStyle::Normal => None,
        NodeStyle::Focus => Some("penwidth=3, color=\"#1d69cc\""),
        NodeStyle::Ancestor => Some("color=\"#FFA500\""),
        NodeStyle::Descendant => Some("color=\"#32CD32\""),
        NodeStyle::Dimmed => Some("color=\"#f6f6f6\", fontcolor=\"#bbbbbb\""),
    }
}

fn edge_style_attrs(style: EdgeStyle) -> Option<&'static str> {
    match style {
        EdgeStyle::Normal => None,
        EdgeStyle::Prerequisite => Some("color=\"#FFA500\", penwidth=2"),
        EdgeStyle::Dependent => Some("color=\"#32CD32\", penwidth=2"),
        EdgeStyle::Hidden => Some("style=invis"),
    }
}

fn node_label(graph: &CourseGraph, id: &CourseId) -> String {
    format!("{} ({})", graph.label(id), id)
}

fn sorted_children(graph: &CourseGraph, node: &CourseId) -> Vec<CourseId> {
    let mut children = graph.dependents_of(node).to_vec();
    children.sort();
    children
}

fn render_tree_children(
    graph: &CourseGraph,
    node: &CourseId,
    prefix: &str,
    path: &mut Vec<CourseId>,
    out: &mut String,
) {
    let children = sorted_children(graph, node);
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(&node_label(graph, child));
        if path.iter().any(|id| id == child) {
            out.push_str(" (cycle)");
            out.push('\n');
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_tree_children(graph, child, &next_prefix, path, out);
        path.pop();
    }
}

fn render_flat_children(
    graph: &CourseGraph,
    node: &CourseId,
    depth: usize,
    path: &mut Vec<CourseId>,
    out: &mut String,
) {
    for child in sorted_children(graph, node) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&node_label(graph, &child));
        if path.iter().any(|id| id == &child) {
            out.push_str(" (cycle)");
            out.push('\n');
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        render_flat_children(graph, &child, depth + 1, path, out);
        path.pop();
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
