use std::sync::Arc;

use crate::core::course::CourseId;
use crate::graph::viz::render_dot;
use crate::graph::{CourseGraph, HighlightSets};
use crate::render::style::StyleOverrides;
use crate::render::RenderAdapter;

/// Keeps the latest graph and styles and renders them as Graphviz text.
#[derive(Debug, Default)]
pub struct DotAdapter {
    graph: Option<Arc<CourseGraph>>,
    overrides: StyleOverrides,
}

impl DotAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overrides(&self) -> &StyleOverrides {
        &self.overrides
    }

    pub fn render(&self) -> String {
        match self.graph.as_deref() {
            Some(graph) => render_dot(graph, Some(&self.overrides)),
            None => String::from("digraph coursegraph {\n}\n"),
        }
    }
}

impl RenderAdapter for DotAdapter {
    fn set_graph(&mut self, graph: Arc<CourseGraph>) {
        self.graph = Some(graph);
        self.overrides = StyleOverrides::default();
    }

    fn set_style_overrides(&mut self, focus: Option<&CourseId>, highlight: &HighlightSets) {
        self.overrides = match self.graph.as_deref() {
            Some(graph) => StyleOverrides::derive(graph, focus, highlight),
            None => StyleOverrides::default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DotAdapter;
    use crate::core::catalog::Catalog;
    use crate::core::course::{Course, CourseId};
    use crate::graph::{build_graph, highlight_sets, BuildOptions, HighlightSets};
    use crate::render::{NodeStyle, RenderAdapter};

    #[test]
    fn renders_empty_digraph_before_a_graph_arrives() {
        assert_eq!(DotAdapter::new().render(), "digraph coursegraph {\n}\n");
    }

    #[test]
    fn restyles_on_focus_and_resets_on_new_graph() {
        let graph = Arc::new(build_graph(
            &Catalog::new(vec![
                Course::new("x", "X", 1, 1),
                Course::new("y", "Y", 1, 2).with_prerequisites(["x"]),
            ]),
            &BuildOptions::default(),
        ));
        let mut adapter = DotAdapter::new();
        adapter.set_graph(Arc::clone(&graph));

        let focus = CourseId::new("y");
        adapter.set_style_overrides(Some(&focus), &highlight_sets(&graph, &focus));
        assert_eq!(adapter.overrides().node(&CourseId::new("x")), NodeStyle::Ancestor);
        assert!(adapter.render().contains("color=\"#FFA500\""));

        adapter.set_style_overrides(None, &HighlightSets::default());
        assert_eq!(adapter.overrides().node(&CourseId::new("x")), NodeStyle::Normal);

        adapter.set_style_overrides(Some(&focus), &highlight_sets(&graph, &focus));
        adapter.set_graph(graph);
        assert!(adapter.overrides().focus().is_none());
    }
}
