//! Focus tracking for hover and selection.
//!
//! Two states: `Idle` and `Focused`. Entering a node always recomputes the
//! highlight sets from scratch; leaving returns to `Idle`. There is no
//! stacking of focuses and no error state.

use std::sync::Arc;

use tracing::debug;

use crate::core::course::CourseId;
use crate::graph::{highlight_sets, CourseGraph, HighlightSets, ReachabilityCache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    Enter(CourseId),
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    pub node: CourseId,
    pub highlight: HighlightSets,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    Focused(Focus),
}

impl InteractionState {
    /// Pure transition: the next state after `event` on `graph`.
    pub fn apply(self, graph: &CourseGraph, event: FocusEvent) -> Self {
        match event {
            FocusEvent::Enter(node) => {
                let highlight = highlight_sets(graph, &node);
                Self::Focused(Focus { node, highlight })
            }
            FocusEvent::Leave => Self::Idle,
        }
    }

    pub fn focus(&self) -> Option<&CourseId> {
        match self {
            Self::Idle => None,
            Self::Focused(focus) => Some(&focus.node),
        }
    }

    pub fn highlight(&self) -> Option<&HighlightSets> {
        match self {
            Self::Idle => None,
            Self::Focused(focus) => Some(&focus.highlight),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Owns the current graph snapshot and the focus state derived from it.
#[derive(Debug)]
pub struct InteractionController {
    graph: Arc<CourseGraph>,
    state: InteractionState,
    cache: ReachabilityCache,
}

impl InteractionController {
    pub fn new(graph: Arc<CourseGraph>) -> Self {
        Self {
            graph,
            state: InteractionState::Idle,
            cache: ReachabilityCache::new(),
        }
    }

    pub fn graph(&self) -> &Arc<CourseGraph> {
        &self.graph
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn on_focus_enter(&mut self, node: CourseId) -> &InteractionState {
        if !self.graph.contains(&node) {
            debug!(focus = %node, "focus on unknown node, no highlight");
        }
        let highlight = self.cache.highlight_sets(&self.graph, &node);
        self.state = InteractionState::Focused(Focus { node, highlight });
        &self.state
    }

    pub fn on_focus_leave(&mut self) -> &InteractionState {
        self.state = InteractionState::Idle;
        &self.state
    }

    pub fn handle(&mut self, event: FocusEvent) -> &InteractionState {
        match event {
            FocusEvent::Enter(node) => self.on_focus_enter(node),
            FocusEvent::Leave => self.on_focus_leave(),
        }
    }

    /// Swaps in a rebuilt graph. Any focus belonged to the old snapshot, so
    /// the controller goes back to `Idle`.
    pub fn replace_graph(&mut self, graph: Arc<CourseGraph>) {
        self.graph = graph;
        self.cache.clear();
        self.state = InteractionState::Idle;
    }
}
