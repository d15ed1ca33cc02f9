use crate::core::course::CourseId;
use crate::graph::CourseGraph;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Empty,
    /// A single node whose title equals the query.
    Selected(CourseId),
    Suggestions(Vec<CourseId>),
}

/// Case-insensitive title search. A lone match whose title is the whole
/// query selects that node; anything else is a list of suggestions.
pub fn search(graph: &CourseGraph, query: &str) -> SearchResult {
    let query = query.trim();
    if query.is_empty() {
        return SearchResult::Empty;
    }
    let needle = query.to_lowercase();

    let matches: Vec<&CourseId> = graph
        .nodes()
        .iter()
        .filter(|node| node.course.title.to_lowercase().contains(&needle))
        .map(|node| &node.id)
        .collect();

    match matches.as_slice() {
        [only] if graph.label(only).to_lowercase() == needle => {
            SearchResult::Selected((*only).clone())
        }
        _ => SearchResult::Suggestions(matches.into_iter().cloned().collect()),
    }
}
