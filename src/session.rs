use std::sync::Arc;

use tracing::debug;

use crate::core::catalog::Catalog;
use crate::core::course::CourseId;
use crate::graph::search::{search, SearchResult};
use crate::graph::{build_graph, BuildOptions, CourseGraph, HighlightSets, ViewSelection};
use crate::render::RenderAdapter;
use crate::state::{InteractionController, InteractionState};

/// Wires catalog, builder, focus controller and a render adapter together.
/// Every event is handled to completion before the call returns.
pub struct Session<A: RenderAdapter> {
    catalog: Catalog,
    options: BuildOptions,
    dedupe_override: Option<bool>,
    controller: InteractionController,
    adapter: A,
}

impl<A: RenderAdapter> Session<A> {
    pub fn new(catalog: Catalog, options: BuildOptions, mut adapter: A) -> Self {
        let graph = Arc::new(build_graph(&catalog, &options));
        adapter.set_graph(Arc::clone(&graph));
        adapter.set_style_overrides(None, &HighlightSets::default());
        Self {
            catalog,
            options,
            dedupe_override: None,
            controller: InteractionController::new(graph),
            adapter,
        }
    }

    /// Keeps a configured deduplication choice across track changes.
    pub fn with_dedupe_override(mut self, dedupe: Option<bool>) -> Self {
        self.dedupe_override = dedupe;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn graph(&self) -> &Arc<CourseGraph> {
        self.controller.graph()
    }

    pub fn state(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    pub fn specialization_changed(&mut self, selection: ViewSelection) {
        self.options = BuildOptions::for_view(&selection, self.dedupe_override);
        debug!(?selection, "rebuilding graph for new view");
        let graph = Arc::new(build_graph(&self.catalog, &self.options));
        self.controller.replace_graph(Arc::clone(&graph));
        self.adapter.set_graph(graph);
        self.push_styles();
    }

    pub fn on_pointer_enter_node(&mut self, node: CourseId) {
        self.controller.on_focus_enter(node);
        self.push_styles();
    }

    pub fn on_pointer_leave_node(&mut self) {
        self.controller.on_focus_leave();
        self.push_styles();
    }

    /// Runs a title search; a unique exact hit becomes the focus.
    pub fn search(&mut self, query: &str) -> SearchResult {
        let result = search(self.controller.graph(), query);
        if let SearchResult::Selected(node) = &result {
            self.on_pointer_enter_node(node.clone());
        }
        result
    }

    fn push_styles(&mut self) {
        let empty = HighlightSets::default();
        let state = self.controller.state();
        let highlight = state.highlight().unwrap_or(&empty);
        self.adapter.set_style_overrides(state.focus(), highlight);
    }
}
