//! Transitive prerequisite/dependent lookups used for focus highlighting.
//!
//! Traversals keep a visited set and pre-mark the focus, so every node is
//! expanded at most once and the focus is never reported, even when the
//! graph contains a cycle back to it.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::core::course::CourseId;
use crate::graph::CourseGraph;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightSets {
    pub ancestors: HashSet<CourseId>,
    pub descendants: HashSet<CourseId>,
}

impl HighlightSets {
    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty() && self.descendants.is_empty()
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.ancestors.contains(id) || self.descendants.contains(id)
    }
}

/// Every node transitively required by `focus`. Unknown ids give an empty set.
pub fn ancestors(graph: &CourseGraph, focus: &CourseId) -> HashSet<CourseId> {
    traverse(graph, focus, |id| graph.prerequisites_of(id))
}

/// Every node that transitively requires `focus`. Unknown ids give an empty set.
pub fn descendants(graph: &CourseGraph, focus: &CourseId) -> HashSet<CourseId> {
    traverse(graph, focus, |id| graph.dependents_of(id))
}

pub fn highlight_sets(graph: &CourseGraph, focus: &CourseId) -> HighlightSets {
    HighlightSets {
        ancestors: ancestors(graph, focus),
        descendants: descendants(graph, focus),
    }
}

pub fn direct_prerequisites(graph: &CourseGraph, focus: &CourseId) -> Vec<CourseId> {
    sorted_neighbours(graph.prerequisites_of(focus), focus)
}

pub fn direct_dependents(graph: &CourseGraph, focus: &CourseId) -> Vec<CourseId> {
    sorted_neighbours(graph.dependents_of(focus), focus)
}

fn sorted_neighbours(neighbours: &[CourseId], focus: &CourseId) -> Vec<CourseId> {
    let mut out: Vec<CourseId> = neighbours
        .iter()
        .filter(|id| *id != focus)
        .cloned()
        .collect();
    out.sort();
    out.dedup();
    out
}

fn traverse<'g, F>(graph: &'g CourseGraph, focus: &CourseId, next: F) -> HashSet<CourseId>
where
    F: Fn(&CourseId) -> &'g [CourseId],
{
    let mut found = HashSet::new();
    if !graph.contains(focus) {
        return found;
    }

    let mut visited: HashSet<&CourseId> = HashSet::new();
    visited.insert(focus);
    let mut queue: VecDeque<&CourseId> = VecDeque::new();
    queue.push_back(focus);

    while let Some(current) = queue.pop_front() {
        for neighbour in next(current) {
            if visited.insert(neighbour) {
                found.insert(neighbour.clone());
                queue.push_back(neighbour);
            }
        }
    }
    found
}

/// Per-focus memo of highlight sets for one graph snapshot.
///
/// The cache remembers which graph generation it was filled from and empties
/// itself when asked about a different one.
#[derive(Debug, Default)]
pub struct ReachabilityCache {
    generation: Option<u64>,
    entries: HashMap<CourseId, HighlightSets>,
}

impl ReachabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlight_sets(&mut self, graph: &CourseGraph, focus: &CourseId) -> HighlightSets {
        if self.generation != Some(graph.generation()) {
            self.entries.clear();
            self.generation = Some(graph.generation());
        }
        if let Some(hit) = self.entries.get(focus) {
            debug!(focus = %focus, "highlight cache hit");
            return hit.clone();
        }
        let sets = highlight_sets(graph, focus);
        self.entries.insert(focus.clone(), sets.clone());
        sets
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
