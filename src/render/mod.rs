//! The boundary between the interaction core and whatever draws the graph.
//!
//! The core hands an adapter a graph snapshot and, after every focus change,
//! the current focus with its highlight sets. Adapters never mutate the graph.

use std::sync::Arc;

use crate::core::course::CourseId;
use crate::graph::{CourseGraph, HighlightSets};

pub mod dot;
pub mod style;
pub mod terminal;

pub use dot::DotAdapter;
pub use style::{EdgeStyle, NodeStyle, StyleOverrides};
pub use terminal::TerminalAdapter;

pub trait RenderAdapter {
    fn set_graph(&mut self, graph: Arc<CourseGraph>);
    fn set_style_overrides(&mut self, focus: Option<&CourseId>, highlight: &HighlightSets);
}
