use std::collections::HashMap;

use serde::Serialize;

use crate::core::course::CourseId;
use crate::graph::{CourseGraph, Edge, HighlightSets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    Normal,
    Focus,
    Ancestor,
    Descendant,
    Dimmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Normal,
    Prerequisite,
    Dependent,
    Hidden,
}

/// Per-element style decisions for one interaction state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverrides {
    focus: Option<CourseId>,
    nodes: HashMap<CourseId, NodeStyle>,
    edges: HashMap<Edge, EdgeStyle>,
}

impl StyleOverrides {
    pub fn derive(
        graph: &CourseGraph,
        focus: Option<&CourseId>,
        highlight: &HighlightSets,
    ) -> Self {
        let Some(focus) = focus else {
            return Self::default();
        };

        let nodes = graph
            .nodes()
            .iter()
            .map(|node| {
                let style = if &node.id == focus {
                    NodeStyle::Focus
                } else if highlight.ancestors.contains(&node.id) {
                    NodeStyle::Ancestor
                } else if highlight.descendants.contains(&node.id) {
                    NodeStyle::Descendant
                } else {
                    NodeStyle::Dimmed
                };
                (node.id.clone(), style)
            })
            .collect();

        let upstream = |id: &CourseId| id == focus || highlight.ancestors.contains(id);
        let downstream = |id: &CourseId| id == focus || highlight.descendants.contains(id);
        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let style = if upstream(&edge.from) && upstream(&edge.to) {
                    EdgeStyle::Prerequisite
                } else if downstream(&edge.from) && downstream(&edge.to) {
                    EdgeStyle::Dependent
                } else {
                    EdgeStyle::Hidden
                };
                (edge.clone(), style)
            })
            .collect();

        Self {
            focus: Some(focus.clone()),
            nodes,
            edges,
        }
    }

    pub fn focus(&self) -> Option<&CourseId> {
        self.focus.as_ref()
    }

    pub fn node(&self, id: &CourseId) -> NodeStyle {
        self.nodes.get(id).copied().unwrap_or(NodeStyle::Normal)
    }

    pub fn edge(&self, edge: &Edge) -> EdgeStyle {
        self.edges.get(edge).copied().unwrap_or(EdgeStyle::Normal)
    }
}
