use std::io::{self, Write};
use std::sync::Arc;

use console::style;

use crate::core::course::CourseId;
use crate::graph::{CourseGraph, HighlightSets};
use crate::render::RenderAdapter;

/// Prints a short textual summary of every graph swap and focus change.
pub struct TerminalAdapter<W: Write = io::Stdout> {
    out: W,
    graph: Option<Arc<CourseGraph>>,
}

impl TerminalAdapter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalAdapter<W> {
    pub fn new(out: W) -> Self {
        Self { out, graph: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn labels(&self, ids: impl IntoIterator<Item = CourseId>) -> String {
        let mut ids: Vec<CourseId> = ids.into_iter().collect();
        ids.sort();
        let labels: Vec<String> = ids
            .iter()
            .map(|id| match self.graph.as_deref() {
                Some(graph) => format!("{} ({})", graph.label(id), id),
                None => id.to_string(),
            })
            .collect();
        if labels.is_empty() {
            "-".to_string()
        } else {
            labels.join(", ")
        }
    }
}

impl<W: Write> RenderAdapter for TerminalAdapter<W> {
    fn set_graph(&mut self, graph: Arc<CourseGraph>) {
        let view = graph
            .options()
            .specialization
            .clone()
            .unwrap_or_else(|| "all tracks".to_string());
        let _ = writeln!(
            self.out,
            "{} {} courses, {} links ({})",
            style("graph").cyan(),
            graph.len(),
            graph.edges().len(),
            view
        );
        self.graph = Some(graph);
    }

    fn set_style_overrides(&mut self, focus: Option<&CourseId>, highlight: &HighlightSets) {
        let Some(focus) = focus else {
            let _ = writeln!(self.out, "{}", style("no focus").dim());
            return;
        };
        let title = self
            .graph
            .as_deref()
            .map(|graph| graph.label(focus).to_string())
            .unwrap_or_else(|| focus.to_string());
        let prerequisites = self.labels(highlight.ancestors.iter().cloned());
        let unlocks = self.labels(highlight.descendants.iter().cloned());
        let _ = writeln!(
            self.out,
            "{} {} ({})",
            style("focus").bold(),
            title,
            focus
        );
        self.write_details(focus);
        let _ = writeln!(self.out, "  {} {}", style("requires").yellow(), prerequisites);
        let _ = writeln!(self.out, "  {} {}", style("unlocks").green(), unlocks);
    }
}

impl<W: Write> TerminalAdapter<W> {
    /// Year, semester, type, direct prerequisites and description of the
    /// focused node. Unknown ids print nothing.
    fn write_details(&mut self, focus: &CourseId) {
        let Some(graph) = self.graph.clone() else {
            return;
        };
        let Some(node) = graph.node(focus) else {
            return;
        };
        let kind = if node.course.optional {
            "optional"
        } else {
            "mandatory"
        };
        let _ = writeln!(
            self.out,
            "  year {}, semester {}, {}",
            node.course.year, node.course.semester, kind
        );
        let direct = self.labels(graph.prerequisites_of(focus).iter().cloned());
        let _ = writeln!(self.out, "  {} {}", style("prerequisites").cyan(), direct);
        if let Some(description) = node
            .course
            .description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        {
            let _ = writeln!(self.out, "  {}", description.trim());
        }
    }
}
