use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::core::course::{Course, CourseId};

pub mod builder;
pub mod ops;
pub mod reach;
pub mod search;
pub mod viz;

pub use builder::{build_graph, BuildOptions, ViewSelection};
pub use reach::{ancestors, descendants, highlight_sets, HighlightSets, ReachabilityCache};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A directed prerequisite link: `from` must be taken before `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    pub from: CourseId,
    pub to: CourseId,
}

impl Edge {
    pub fn new(from: CourseId, to: CourseId) -> Self {
        Self { from, to }
    }
}

/// A rendered node. Under title deduplication one node stands for every
/// course sharing the representative's title.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseNode {
    pub id: CourseId,
    pub course: Course,
    pub members: Vec<CourseId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropReason {
    /// The referenced id is not in the catalog at all.
    Dangling,
    /// The referenced course exists but was filtered out of this view.
    OutsideFilter,
    /// Both ends collapsed onto the same node under title deduplication.
    CollapsedSelfLoop,
}

/// A prerequisite link from the catalog that did not become an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEdge {
    pub from: CourseId,
    pub to: CourseId,
    pub reason: DropReason,
}

/// Immutable snapshot of the course graph. Rebuilding is the only way to
/// change it.
#[derive(Debug, Clone)]
pub struct CourseGraph {
    generation: u64,
    options: BuildOptions,
    nodes: Vec<CourseNode>,
    index: HashMap<CourseId, usize>,
    aliases: HashMap<CourseId, CourseId>,
    edges: Vec<Edge>,
    outgoing: HashMap<CourseId, Vec<CourseId>>,
    incoming: HashMap<CourseId, Vec<CourseId>>,
    dropped: Vec<DroppedEdge>,
}

impl CourseGraph {
    pub(crate) fn from_parts(
        options: BuildOptions,
        nodes: Vec<CourseNode>,
        edges: Vec<Edge>,
        dropped: Vec<DroppedEdge>,
    ) -> Self {
        let mut index = HashMap::new();
        let mut aliases = HashMap::new();
        for (pos, node) in nodes.iter().enumerate() {
            index.insert(node.id.clone(), pos);
            for member in &node.members {
                aliases.insert(member.clone(), node.id.clone());
            }
        }

        let mut outgoing: HashMap<CourseId, Vec<CourseId>> = HashMap::new();
        let mut incoming: HashMap<CourseId, Vec<CourseId>> = HashMap::new();
        for edge in &edges {
            outgoing
                .entry(edge.from.clone())
                .or_default()
                .push(edge.to.clone());
            incoming
                .entry(edge.to.clone())
                .or_default()
                .push(edge.from.clone());
        }

        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            options,
            nodes,
            index,
            aliases,
            edges,
            outgoing,
            incoming,
            dropped,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn nodes(&self) -> &[CourseNode] {
        &self.nodes
    }

    pub fn node(&self, id: &CourseId) -> Option<&CourseNode> {
        self.index.get(id).and_then(|pos| self.nodes.get(*pos))
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.index.contains_key(id)
    }

    /// Maps any underlying course id to the id of the node displaying it.
    pub fn resolve(&self, id: &CourseId) -> Option<&CourseId> {
        self.aliases.get(id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_edge(&self, from: &CourseId, to: &CourseId) -> bool {
        self.outgoing
            .get(from)
            .map(|targets| targets.contains(to))
            .unwrap_or(false)
    }

    /// Nodes with an edge into `id`.
    pub fn prerequisites_of(&self, id: &CourseId) -> &[CourseId] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes `id` has an edge into.
    pub fn dependents_of(&self, id: &CourseId) -> &[CourseId] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dropped(&self) -> &[DroppedEdge] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Display label for a node id, falling back to the id itself.
    pub fn label<'a>(&'a self, id: &'a CourseId) -> &'a str {
        self.node(id)
            .map(|node| node.course.title.as_str())
            .unwrap_or_else(|| id.as_str())
    }
}
