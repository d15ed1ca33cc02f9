use std::collections::{BTreeSet, HashMap};

use anyhow::{anyhow, Result};

use crate::core::course::CourseId;
use crate::graph::CourseGraph;

/// Nodes without prerequisites, in node order. Falls back to every node when
/// each one has a prerequisite (only possible with a cycle).
pub fn roots(graph: &CourseGraph) -> Vec<CourseId> {
    let roots: Vec<CourseId> = graph
        .nodes()
        .iter()
        .filter(|node| graph.prerequisites_of(&node.id).is_empty())
        .map(|node| node.id.clone())
        .collect();
    if roots.is_empty() {
        return graph.nodes().iter().map(|node| node.id.clone()).collect();
    }
    roots
}

pub fn find_cycles(graph: &CourseGraph) -> Vec<Vec<CourseId>> {
    let mut state: HashMap<CourseId, VisitState> = HashMap::new();
    let mut stack: Vec<CourseId> = Vec::new();
    let mut cycles = Vec::new();

    for node in graph.nodes() {
        if state.contains_key(&node.id) {
            continue;
        }
        visit_node(&node.id, graph, &mut state, &mut stack, &mut cycles);
    }

    cycles
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

fn visit_node(
    node: &CourseId,
    graph: &CourseGraph,
    state: &mut HashMap<CourseId, VisitState>,
    stack: &mut Vec<CourseId>,
    cycles: &mut Vec<Vec<CourseId>>,
) {
    if let Some(existing) = state.get(node) {
        if *existing == VisitState::Visiting {
            if let Some(pos) = stack.iter().position(|id| id == node) {
                cycles.push(stack[pos..].to_vec());
            }
        }
        return;
    }

    state.insert(node.clone(), VisitState::Visiting);
    stack.push(node.clone());
    for next in graph.dependents_of(node) {
        visit_node(next, graph, state, stack, cycles);
    }
    stack.pop();
    state.insert(node.clone(), VisitState::Visited);
}

/// Topological order over the prerequisite edges. Among courses that are
/// ready at the same time, earlier year/semester comes first, then catalog
/// order.
pub fn study_order(graph: &CourseGraph) -> Result<Vec<CourseId>> {
    let position: HashMap<&CourseId, usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(pos, node)| (&node.id, pos))
        .collect();
    let rank = |id: &CourseId| -> (u8, u8, usize) {
        let pos = position.get(id).copied().unwrap_or(usize::MAX);
        match graph.node(id) {
            Some(node) => (node.course.year, node.course.semester, pos),
            None => (u8::MAX, u8::MAX, pos),
        }
    };

    let mut indegree: HashMap<&CourseId, usize> = HashMap::new();
    for node in graph.nodes() {
        indegree.entry(&node.id).or_insert(0);
    }
    for edge in graph.edges() {
        *indegree.entry(&edge.to).or_insert(0) += 1;
    }

    let mut ready: BTreeSet<((u8, u8, usize), &CourseId)> = indegree
        .iter()
        .filter(|(_, &count)| count == 0)
        .map(|(id, _)| (rank(*id), *id))
        .collect();
    let mut order = Vec::new();

    while let Some(entry) = ready.pop_first() {
        let (_, node) = entry;
        order.push(node.clone());
        for dep in graph.dependents_of(node) {
            if let Some(count) = indegree.get_mut(dep) {
                if *count > 0 {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert((rank(dep), dep));
                    }
                }
            }
        }
    }

    if order.len() != graph.len() {
        return Err(anyhow!("cycle detected in prerequisite graph"));
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::{find_cycles, roots, study_order};
    use crate::core::catalog::Catalog;
    use crate::core::course::{Course, CourseId};
    use crate::graph::{build_graph, BuildOptions, CourseGraph};

    fn graph_of(courses: Vec<Course>) -> CourseGraph {
        build_graph(&Catalog::new(courses), &BuildOptions::default())
    }

    fn ids(values: &[CourseId]) -> Vec<&str> {
        values.iter().map(CourseId::as_str).collect()
    }

    #[test]
    fn study_order_respects_edges_and_prefers_earlier_semesters() {
        let graph = graph_of(vec![
            Course::new("geom", "Geometrie", 2, 1).with_prerequisites(["alg2"]),
            Course::new("alg2", "Algebra 2", 1, 2).with_prerequisites(["alg1"]),
            Course::new("logica", "Logica", 1, 2),
            Course::new("alg1", "Algebra 1", 1, 1),
        ]);
        let order = study_order(&graph).expect("acyclic graph");
        assert_eq!(ids(&order), vec!["alg1", "alg2", "logica", "geom"]);

        for edge in graph.edges() {
            let from = order.iter().position(|id| id == &edge.from).expect("from");
            let to = order.iter().position(|id| id == &edge.to).expect("to");
            assert!(from < to);
        }
    }

    #[test]
    fn study_order_fails_on_cycle() {
        let graph = graph_of(vec![
            Course::new("a", "A", 1, 1).with_prerequisites(["b"]),
            Course::new("b", "B", 1, 2).with_prerequisites(["a"]),
        ]);
        let err = study_order(&graph).expect_err("cycle should fail");
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn find_cycles_reports_the_loop() {
        let graph = graph_of(vec![
            Course::new("a", "A", 1, 1).with_prerequisites(["b"]),
            Course::new("b", "B", 1, 2).with_prerequisites(["a"]),
            Course::new("c", "C", 2, 1).with_prerequisites(["b"]),
        ]);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        let mut members = ids(&cycles[0]);
        members.sort();
        assert_eq!(members, vec!["a", "b"]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = graph_of(vec![
            Course::new("a", "A", 1, 1),
            Course::new("b", "B", 1, 2).with_prerequisites(["a"]),
        ]);
        assert!(find_cycles(&graph).is_empty());
        assert_eq!(ids(&roots(&graph)), vec!["a"]);
    }

    #[test]
    fn roots_fall_back_to_all_nodes_when_everything_has_a_prerequisite() {
        let graph = graph_of(vec![
            Course::new("a", "A", 1, 1).with_prerequisites(["b"]),
            Course::new("b", "B", 1, 2).with_prerequisites(["a"]),
        ]);
        assert_eq!(ids(&roots(&graph)), vec!["a", "b"]);
    }
}
