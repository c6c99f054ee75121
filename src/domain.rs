//! Domain model shared by the solvers.
//!
//! # Overview
//!
//! - [`City`]: a point in n-dimensional space with Euclidean distance
//! - [`Item`]: a knapsack item with integer weight and value
//! - [`AdjacencyList`]: node to neighbor mapping that keeps insertion order
//! - [`AdjacencyMatrix`]: dense 0/1 matrix over nodes `0..n`
//!
//! All values are built from one request, handed to one solver and dropped
//! afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// Node identifier for both graph representations.
pub type NodeId = u64;

/// A city given by its coordinates.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::domain::City;
///
/// let a = City::new(vec![0.0, 0.0]);
/// let b = City::new(vec![3.0, 4.0]);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// assert_eq!(a.dimension(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    coordinates: Vec<f64>,
}

impl City {
    pub fn new(coordinates: Vec<f64>) -> Self {
        Self { coordinates }
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    /// Euclidean distance. Both cities must have the same dimension.
    pub fn distance_to(&self, other: &City) -> f64 {
        self.coordinates
            .iter()
            .zip(&other.coordinates)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// A knapsack item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub weight: u64,
    pub value: u64,
}

impl Item {
    pub fn new(weight: u64, value: u64) -> Self {
        Self { weight, value }
    }
}

/// Graph as node to neighbors, in insertion order.
///
/// Re-inserting an existing node replaces its neighbors but keeps its
/// original position, so processing order always follows first appearance.
///
/// ```
/// use combinatorics_solver::domain::AdjacencyList;
///
/// let mut graph = AdjacencyList::new();
/// graph.insert(2, vec![0]);
/// graph.insert(0, vec![2]);
/// graph.insert(2, vec![0, 1]);
///
/// let order: Vec<u64> = graph.nodes().collect();
/// assert_eq!(order, vec![2, 0]);
/// assert_eq!(graph.neighbors(2), Some(&[0, 1][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyList {
    entries: Vec<(NodeId, Vec<NodeId>)>,
}

impl AdjacencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, neighbors: Vec<NodeId>) {
        match self.entries.iter_mut().find(|(n, _)| *n == node) {
            Some((_, existing)) => *existing = neighbors,
            None => self.entries.push((node, neighbors)),
        }
    }

    pub fn neighbors(&self, node: NodeId) -> Option<&[NodeId]> {
        self.entries
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, neighbors)| neighbors.as_slice())
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[NodeId])> + '_ {
        self.entries.iter().map(|(n, neighbors)| (*n, neighbors.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(NodeId, Vec<NodeId>)> for AdjacencyList {
    fn from_iter<I: IntoIterator<Item = (NodeId, Vec<NodeId>)>>(iter: I) -> Self {
        let mut graph = AdjacencyList::new();
        for (node, neighbors) in iter {
            graph.insert(node, neighbors);
        }
        graph
    }
}

/// A dense n×n adjacency matrix stored in row-major order.
///
/// Entries are read as directed edges `from -> to`.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::domain::AdjacencyMatrix;
///
/// let m = AdjacencyMatrix::from_rows(&[vec![0, 1], vec![1, 0]]).unwrap();
/// assert_eq!(m.size(), 2);
/// assert!(m.has_edge(0, 1));
/// assert!(!m.has_edge(0, 0));
///
/// assert!(AdjacencyMatrix::from_rows(&[vec![0, 1]]).is_err());
/// assert!(AdjacencyMatrix::from_rows(&[vec![2]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    edges: Vec<bool>,
    size: usize,
}

impl AdjacencyMatrix {
    /// Builds a matrix from rows, rejecting empty, non-square or non-0/1 input.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(SolverError::invalid("Graph matrix must not be empty"));
        }

        let mut edges = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(SolverError::invalid(format!(
                    "Graph matrix must be square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            for (j, &entry) in row.iter().enumerate() {
                match entry {
                    0 => edges.push(false),
                    1 => edges.push(true),
                    other => {
                        return Err(SolverError::invalid(format!(
                            "Graph matrix entries must be 0 or 1, found {} at [{}][{}]",
                            other, i, j
                        )))
                    }
                }
            }
        }

        Ok(Self { edges, size })
    }

    /// Complete graph on `size` nodes without self-loops.
    pub fn complete(size: usize) -> Self {
        let edges = (0..size * size).map(|k| k / size != k % size).collect();
        Self { edges, size }
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges[from * self.size + to]
    }

    pub fn size(&self) -> usize {
        self.size
    }
}
