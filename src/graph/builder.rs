use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::catalog::Catalog;
use crate::core::course::{Course, CourseId};
use crate::graph::{CourseGraph, CourseNode, DropReason, DroppedEdge, Edge};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    pub dedupe_by_title: bool,
    pub specialization: Option<String>,
}

/// What the track picker currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSelection {
    All,
    Track(String),
}

impl ViewSelection {
    pub fn from_option(track: Option<String>) -> Self {
        match track {
            Some(track) => Self::Track(track),
            None => Self::All,
        }
    }
}

impl BuildOptions {
    /// All tracks collapse same-titled courses; a single track shows its
    /// courses as they are. `dedupe_override` replaces either default.
    pub fn for_view(selection: &ViewSelection, dedupe_override: Option<bool>) -> Self {
        match selection {
            ViewSelection::All => Self {
                dedupe_by_title: dedupe_override.unwrap_or(true),
                specialization: None,
            },
            ViewSelection::Track(track) => Self {
                dedupe_by_title: dedupe_override.unwrap_or(false),
                specialization: Some(track.clone()),
            },
        }
    }

    fn includes(&self, course: &Course) -> bool {
        self.specialization
            .as_deref()
            .map(|track| course.specialization == track)
            .unwrap_or(true)
    }
}

pub fn build_graph(catalog: &Catalog, options: &BuildOptions) -> CourseGraph {
    let mut nodes: Vec<CourseNode> = Vec::new();
    let mut node_pos: HashMap<CourseId, usize> = HashMap::new();
    // course id -> id of the node that displays it
    let mut node_of: HashMap<CourseId, CourseId> = HashMap::new();
    let mut title_rep: HashMap<&str, CourseId> = HashMap::new();
    let mut included: Vec<&Course> = Vec::new();

    for course in catalog.courses().iter().filter(|c| options.includes(c)) {
        if node_of.contains_key(&course.id) {
            warn!(id = %course.id, "duplicate course id, keeping first record");
            continue;
        }
        included.push(course);

        let rep = if options.dedupe_by_title {
            title_rep
                .entry(course.title.as_str())
                .or_insert_with(|| course.id.clone())
                .clone()
        } else {
            course.id.clone()
        };
        node_of.insert(course.id.clone(), rep.clone());

        match node_pos.get(&rep) {
            Some(pos) => {
                if let Some(node) = nodes.get_mut(*pos) {
                    node.members.push(course.id.clone());
                }
            }
            None => {
                node_pos.insert(rep.clone(), nodes.len());
                nodes.push(CourseNode {
                    id: rep,
                    course: course.clone(),
                    members: vec![course.id.clone()],
                });
            }
        }
    }

    let mut edges = Vec::new();
    let mut seen: HashSet<Edge> = HashSet::new();
    let mut dropped = Vec::new();

    for course in &included {
        let Some(target) = node_of.get(&course.id) else {
            continue;
        };
        for prereq in &course.prerequisite_ids {
            let reason = match node_of.get(prereq) {
                Some(source) if source == target && prereq != &course.id => {
                    Some(DropReason::CollapsedSelfLoop)
                }
                Some(source) => {
                    let edge = Edge::new(source.clone(), target.clone());
                    if seen.insert(edge.clone()) {
                        edges.push(edge);
                    }
                    None
                }
                None if catalog.contains(prereq) => Some(DropReason::OutsideFilter),
                None => Some(DropReason::Dangling),
            };
            if let Some(reason) = reason {
                debug!(from = %prereq, to = %course.id, ?reason, "dropping prerequisite link");
                dropped.push(DroppedEdge {
                    from: prereq.clone(),
                    to: course.id.clone(),
                    reason,
                });
            }
        }
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped = dropped.len(),
        "built course graph"
    );
    CourseGraph::from_parts(options.clone(), nodes, edges, dropped)
}

#[cfg(test)]
mod tests {
    use super::{build_graph, BuildOptions, ViewSelection};
    use crate::core::catalog::Catalog;
    use crate::core::course::{Course, CourseId};
    use crate::graph::{DropReason, Edge};

    fn id(value: &str) -> CourseId {
        CourseId::new(value)
    }

    fn tracks_catalog() -> Catalog {
        Catalog::new(vec![
            Course::new("A1", "Algebra 1", 1, 1).with_specialization("mate"),
            Course::new("B1", "Algebra 1", 1, 1).with_specialization("mate_info"),
            Course::new("A2", "Algebra 2", 1, 2)
                .with_specialization("mate_info")
                .with_prerequisites(["B1"]),
        ])
    }

    #[test]
    fn plain_build_adds_one_node_per_course_and_one_edge_per_link() {
        let catalog = Catalog::new(vec![
            Course::new("x", "X", 1, 1),
            Course::new("y", "Y", 1, 2).with_prerequisites(["x"]),
            Course::new("z", "Z", 2, 1).with_prerequisites(["y", "x"]),
        ]);
        let graph = build_graph(&catalog, &BuildOptions::default());

        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        assert_eq!(
            graph.edges(),
            &[
                Edge::new(id("x"), id("y")),
                Edge::new(id("y"), id("z")),
                Edge::new(id("x"), id("z")),
            ]
        );
        assert!(graph.dropped().is_empty());
    }

    #[test]
    fn dedupe_collapses_same_title_onto_first_course() {
        let graph = build_graph(
            &tracks_catalog(),
            &BuildOptions {
                dedupe_by_title: true,
                specialization: None,
            },
        );

        assert_eq!(graph.len(), 2);
        let algebra = graph.node(&id("A1")).expect("representative node");
        assert_eq!(algebra.members, vec![id("A1"), id("B1")]);
        assert!(graph.node(&id("B1")).is_none());
        assert_eq!(graph.resolve(&id("B1")), Some(&id("A1")));
        assert_eq!(graph.edges(), &[Edge::new(id("A1"), id("A2"))]);
    }

    #[test]
    fn dedupe_merges_duplicate_edges_from_several_tracks() {
        let catalog = Catalog::new(vec![
            Course::new("m1", "Analiza 1", 1, 1).with_specialization("mate"),
            Course::new("i1", "Analiza 1", 1, 1).with_specialization("info"),
            Course::new("m2", "Analiza 2", 1, 2)
                .with_specialization("mate")
                .with_prerequisites(["m1"]),
            Course::new("i2", "Analiza 2", 1, 2)
                .with_specialization("info")
                .with_prerequisites(["i1"]),
        ]);
        let graph = build_graph(&catalog, &BuildOptions::for_view(&ViewSelection::All, None));

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edges(), &[Edge::new(id("m1"), id("m2"))]);
    }

    #[test]
    fn dedupe_drops_links_that_collapse_into_a_self_loop() {
        let catalog = Catalog::new(vec![
            Course::new("p", "Proiect", 3, 1).with_specialization("mate"),
            Course::new("q", "Proiect", 3, 2)
                .with_specialization("info")
                .with_prerequisites(["p"]),
        ]);
        let graph = build_graph(
            &catalog,
            &BuildOptions {
                dedupe_by_title: true,
                specialization: None,
            },
        );

        assert!(graph.edges().is_empty());
        assert_eq!(graph.dropped().len(), 1);
        assert_eq!(graph.dropped()[0].reason, DropReason::CollapsedSelfLoop);
    }

    #[test]
    fn literal_self_reference_is_kept_as_an_edge() {
        let catalog = Catalog::new(vec![Course::new("s", "Seminar", 1, 1).with_prerequisites(["s"])]);
        let graph = build_graph(&catalog, &BuildOptions::default());

        assert_eq!(graph.edges(), &[Edge::new(id("s"), id("s"))]);
    }

    #[test]
    fn filter_drops_edges_leaving_the_track() {
        let graph = build_graph(
            &tracks_catalog(),
            &BuildOptions::for_view(&ViewSelection::Track("mate_info".to_string()), None),
        );

        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["B1", "A2"]);
        assert_eq!(graph.edges(), &[Edge::new(id("B1"), id("A2"))]);

        let graph = build_graph(
            &Catalog::new(vec![
                Course::new("x", "X", 1, 1).with_specialization("mate"),
                Course::new("y", "Y", 1, 2)
                    .with_specialization("info")
                    .with_prerequisites(["x"]),
                Course::new("z", "Z", 2, 1)
                    .with_specialization("mate")
                    .with_prerequisites(["y"]),
            ]),
            &BuildOptions::for_view(&ViewSelection::Track("mate".to_string()), None),
        );
        assert_eq!(graph.len(), 2);
        assert!(graph.edges().is_empty());
        assert_eq!(graph.dropped().len(), 1);
        assert_eq!(graph.dropped()[0].reason, DropReason::OutsideFilter);
        assert_eq!(graph.dropped()[0].from, id("y"));
    }

    #[test]
    fn dangling_reference_is_silently_dropped() {
        let catalog = Catalog::new(vec![
            Course::new("x", "X", 1, 1),
            Course::new("y", "Y", 1, 2).with_prerequisites(["x", "ghost"]),
        ]);
        let graph = build_graph(&catalog, &BuildOptions::default());

        assert_eq!(graph.edges(), &[Edge::new(id("x"), id("y"))]);
        assert_eq!(graph.dropped().len(), 1);
        assert_eq!(graph.dropped()[0].reason, DropReason::Dangling);
    }

    #[test]
    fn duplicate_ids_keep_the_first_record() {
        let catalog = Catalog::new(vec![
            Course::new("x", "First", 1, 1),
            Course::new("x", "Second", 1, 1),
        ]);
        let graph = build_graph(&catalog, &BuildOptions::default());

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.label(&id("x")), "First");
    }

    #[test]
    fn dedupe_override_applies_to_track_view() {
        let options = BuildOptions::for_view(&ViewSelection::Track("mate".to_string()), Some(true));
        assert!(options.dedupe_by_title);
        assert_eq!(options.specialization.as_deref(), Some("mate"));

        let options = BuildOptions::for_view(&ViewSelection::All, Some(false));
        assert!(!options.dedupe_by_title);
    }

    #[test]
    fn dedupe_within_a_track_only_sees_that_track() {
        let catalog = Catalog::new(vec![
            Course::new("o_alg1", "Algebra 1", 1, 1).with_specialization("info"),
            Course::new("m_alg1", "Algebra 1", 1, 1).with_specialization("mate"),
            Course::new("m_alg1b", "Algebra 1", 1, 1).with_specialization("mate"),
            Course::new("m_alg2", "Algebra 2", 1, 2)
                .with_specialization("mate")
                .with_prerequisites(["m_alg1b", "o_alg1"]),
        ]);
        let options =
            BuildOptions::for_view(&ViewSelection::Track("mate".to_string()), Some(true));
        let graph = build_graph(&catalog, &options);

        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["m_alg1", "m_alg2"]);
        let algebra = graph.node(&id("m_alg1")).expect("in-track representative");
        assert_eq!(algebra.members, vec![id("m_alg1"), id("m_alg1b")]);
        assert!(graph.node(&id("o_alg1")).is_none());

        assert_eq!(graph.edges(), &[Edge::new(id("m_alg1"), id("m_alg2"))]);
        assert_eq!(graph.dropped().len(), 1);
        assert_eq!(graph.dropped()[0].from, id("o_alg1"));
        assert_eq!(graph.dropped()[0].to, id("m_alg2"));
        assert_eq!(graph.dropped()[0].reason, DropReason::OutsideFilter);
    }

    #[test]
    fn every_build_gets_a_new_generation() {
        let catalog = tracks_catalog();
        let first = build_graph(&catalog, &BuildOptions::default());
        let second = build_graph(&catalog, &BuildOptions::default());
        assert_ne!(first.generation(), second.generation());
    }
}
