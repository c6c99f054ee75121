//! Greedy graph coloring.
//!
//! Nodes are colored in the graph's insertion order. Each one takes the
//! smallest color not already held by a colored neighbor. The result is a
//! proper coloring but not necessarily a minimum one.

use std::collections::{HashMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::{AdjacencyList, NodeId};
use crate::error::{Result, SolverError};

/// Color per node, in the order nodes were colored.
///
/// Serializes as a JSON object keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    order: Vec<NodeId>,
    colors: HashMap<NodeId, usize>,
}

impl ColorAssignment {
    pub fn color_of(&self, node: NodeId) -> Option<usize> {
        self.colors.get(&node).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.order.iter().map(|node| (*node, self.colors[node]))
    }

    /// Number of distinct colors used.
    pub fn color_count(&self) -> usize {
        self.colors.values().collect::<HashSet<_>>().len()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn assign(&mut self, node: NodeId, color: usize) {
        self.order.push(node);
        self.colors.insert(node, color);
    }
}

impl Serialize for ColorAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (node, color) in self.iter() {
            map.serialize_entry(&node, &color)?;
        }
        map.end()
    }
}

/// Colors `graph` greedily.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::domain::AdjacencyList;
/// use combinatorics_solver::solvers::graph_coloring;
///
/// // Triangle 0-1-2 with a pendant node 3 attached to 0.
/// let graph: AdjacencyList = vec![
///     (0, vec![1, 2, 3]),
///     (1, vec![0, 2]),
///     (2, vec![0, 1]),
///     (3, vec![0]),
/// ]
/// .into_iter()
/// .collect();
///
/// let colors = graph_coloring::solve(&graph).unwrap();
/// assert_eq!(colors.color_of(0), Some(0));
/// assert_eq!(colors.color_of(1), Some(1));
/// assert_eq!(colors.color_of(2), Some(2));
/// assert_eq!(colors.color_of(3), Some(1));
/// ```
pub fn solve(graph: &AdjacencyList) -> Result<ColorAssignment> {
    if graph.is_empty() {
        return Err(SolverError::invalid("Graph must not be empty"));
    }

    let mut assignment = ColorAssignment::default();
    for (node, neighbors) in graph.iter() {
        let taken: HashSet<usize> = neighbors
            .iter()
            .filter_map(|neighbor| assignment.color_of(*neighbor))
            .collect();
        let color = (0..).find(|c| !taken.contains(c)).unwrap_or_default();
        assignment.assign(node, color);
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Random undirected graph with symmetric neighbor lists, keys shuffled.
    fn random_graph(rng: &mut StdRng, nodes: u64, edge_probability: f64) -> AdjacencyList {
        let mut neighbors: Vec<Vec<NodeId>> = vec![Vec::new(); nodes as usize];
        for a in 0..nodes {
            for b in (a + 1)..nodes {
                if rng.gen_bool(edge_probability) {
                    neighbors[a as usize].push(b);
                    neighbors[b as usize].push(a);
                }
            }
        }
        let mut order: Vec<NodeId> = (0..nodes).collect();
        for i in (1..order.len()).rev() {
            order.swap(i, rng.gen_range(0..=i));
        }
        order
            .into_iter()
            .map(|n| (n, neighbors[n as usize].clone()))
            .collect()
    }

    #[test]
    fn test_empty_is_invalid() {
        assert!(solve(&AdjacencyList::new()).is_err());
    }

    #[test]
    fn test_edgeless_graph_uses_one_color() {
        let graph: AdjacencyList = (0..6).map(|n| (n, vec![])).collect();
        let colors = solve(&graph).unwrap();
        assert!(colors.iter().all(|(_, c)| c == 0));
        assert_eq!(colors.color_count(), 1);
    }

    #[test]
    fn test_processing_follows_insertion_order() {
        // Path 0-1-2 listed from the middle.
        let graph: AdjacencyList = vec![(1, vec![0, 2]), (0, vec![1]), (2, vec![1])]
            .into_iter()
            .collect();
        let colors = solve(&graph).unwrap();
        assert_eq!(colors.iter().collect::<Vec<_>>(), vec![(1, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn test_unknown_neighbors_and_self_loops_are_ignored() {
        let graph: AdjacencyList = vec![(0, vec![0, 42]), (1, vec![0])].into_iter().collect();
        let colors = solve(&graph).unwrap();
        assert_eq!(colors.color_of(0), Some(0));
        assert_eq!(colors.color_of(1), Some(1));
        assert_eq!(colors.color_of(42), None);
    }

    #[test]
    fn test_serializes_in_processing_order() {
        let graph: AdjacencyList = vec![(3, vec![7]), (7, vec![3])].into_iter().collect();
        let json = serde_json::to_string(&solve(&graph).unwrap()).unwrap();
        assert_eq!(json, r#"{"3":0,"7":1}"#);
    }

    #[test]
    fn test_random_graphs_are_properly_colored() {
        let mut rng = StdRng::seed_from_u64(7);
        for round in 0..50 {
            let graph = random_graph(&mut rng, 2 + round % 25, 0.3);
            let colors = solve(&graph).unwrap();
            assert_eq!(colors.len(), graph.len());

            for (node, neighbors) in graph.iter() {
                for &neighbor in neighbors {
                    assert_ne!(
                        colors.color_of(node),
                        colors.color_of(neighbor),
                        "edge {}-{} shares a color",
                        node,
                        neighbor
                    );
                }
                // Greedy never needs more than degree + 1 colors.
                assert!(colors.color_of(node).unwrap() <= neighbors.len());
            }
            assert_eq!(solve(&graph).unwrap(), colors);
        }
    }
}
