//! Hamiltonian cycle detection by depth-first backtracking.
//!
//! The search fixes node 0 as the start, extends the path one position at a
//! time with the lowest-numbered admissible node, and undoes the placement
//! when a branch dead-ends. Failing to find a cycle is a normal outcome.

use serde::Serialize;

use crate::domain::AdjacencyMatrix;
use crate::error::Result;

/// Result of a Hamiltonian cycle search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HamiltonianOutcome {
    /// Nodes in visiting order, starting and ending at node 0.
    Cycle(Vec<usize>),
    NoCycle,
}

impl HamiltonianOutcome {
    pub fn cycle(&self) -> Option<&[usize]> {
        match self {
            HamiltonianOutcome::Cycle(nodes) => Some(nodes),
            HamiltonianOutcome::NoCycle => None,
        }
    }
}

/// Search state: one path buffer and visited set reused across the whole
/// recursion, with every placement undone on backtrack.
struct Backtracker<'a> {
    graph: &'a AdjacencyMatrix,
    path: Vec<Option<usize>>,
    visited: Vec<bool>,
}

impl<'a> Backtracker<'a> {
    fn new(graph: &'a AdjacencyMatrix) -> Self {
        let n = graph.size();
        let mut path = vec![None; n];
        let mut visited = vec![false; n];
        path[0] = Some(0);
        visited[0] = true;
        Self {
            graph,
            path,
            visited,
        }
    }

    fn node_at(&self, pos: usize) -> usize {
        // Positions below the current depth are always committed.
        self.path[pos].unwrap_or_default()
    }

    fn is_admissible(&self, candidate: usize, pos: usize) -> bool {
        !self.visited[candidate] && self.graph.has_edge(self.node_at(pos - 1), candidate)
    }

    fn place(&mut self, candidate: usize, pos: usize) {
        self.path[pos] = Some(candidate);
        self.visited[candidate] = true;
    }

    fn undo(&mut self, candidate: usize, pos: usize) {
        self.path[pos] = None;
        self.visited[candidate] = false;
    }

    /// Tries to fill positions `pos..n`; true once a closed cycle exists.
    fn extend(&mut self, pos: usize) -> bool {
        let n = self.graph.size();
        if pos == n {
            return self.graph.has_edge(self.node_at(n - 1), self.node_at(0));
        }

        for candidate in 1..n {
            if !self.is_admissible(candidate, pos) {
                continue;
            }
            self.place(candidate, pos);
            if self.extend(pos + 1) {
                return true;
            }
            self.undo(candidate, pos);
        }
        false
    }

    fn into_cycle(self) -> Vec<usize> {
        let mut cycle: Vec<usize> = self.path.into_iter().flatten().collect();
        cycle.push(0);
        cycle
    }
}

/// Searches `graph` for a Hamiltonian cycle through node 0.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::domain::AdjacencyMatrix;
/// use combinatorics_solver::solvers::hamiltonian::{self, HamiltonianOutcome};
///
/// let square = AdjacencyMatrix::from_rows(&[
///     vec![0, 1, 0, 1],
///     vec![1, 0, 1, 0],
///     vec![0, 1, 0, 1],
///     vec![1, 0, 1, 0],
/// ])
/// .unwrap();
/// assert_eq!(
///     hamiltonian::solve(&square).unwrap(),
///     HamiltonianOutcome::Cycle(vec![0, 1, 2, 3, 0])
/// );
///
/// let star = AdjacencyMatrix::from_rows(&[
///     vec![0, 1, 1],
///     vec![1, 0, 0],
///     vec![1, 0, 0],
/// ])
/// .unwrap();
/// assert_eq!(hamiltonian::solve(&star).unwrap(), HamiltonianOutcome::NoCycle);
/// ```
pub fn solve(graph: &AdjacencyMatrix) -> Result<HamiltonianOutcome> {
    let mut search = Backtracker::new(graph);
    if search.extend(1) {
        Ok(HamiltonianOutcome::Cycle(search.into_cycle()))
    } else {
        Ok(HamiltonianOutcome::NoCycle)
    }
}
