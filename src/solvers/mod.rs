//! The solver core.
//!
//! Six independent solvers, each a pure function of its typed input. None of
//! them shares state with another or with the HTTP layer.

pub mod bin_packing;
pub mod graph_coloring;
pub mod hamiltonian;
pub mod knapsack;
pub mod partitions;
pub mod tsp;

/// The problems served by this crate, one solver each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    Tsp,
    Knapsack,
    GraphColoring,
    HamiltonianCycle,
    BinPacking,
    Partitions,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 6] = [
        ProblemKind::Tsp,
        ProblemKind::Knapsack,
        ProblemKind::GraphColoring,
        ProblemKind::HamiltonianCycle,
        ProblemKind::BinPacking,
        ProblemKind::Partitions,
    ];

    /// Endpoint name, also used in logs.
    ///
    /// ```
    /// use combinatorics_solver::solvers::ProblemKind;
    ///
    /// assert_eq!(ProblemKind::HamiltonianCycle.as_str(), "hamiltonian_cycle");
    /// assert_eq!(ProblemKind::Tsp.algorithm(), "exhaustive permutation search");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemKind::Tsp => "tsp",
            ProblemKind::Knapsack => "knapsack",
            ProblemKind::GraphColoring => "graph_coloring",
            ProblemKind::HamiltonianCycle => "hamiltonian_cycle",
            ProblemKind::BinPacking => "bin_packing",
            ProblemKind::Partitions => "partitions",
        }
    }

    pub fn algorithm(self) -> &'static str {
        match self {
            ProblemKind::Tsp => "exhaustive permutation search",
            ProblemKind::Knapsack => "dynamic programming",
            ProblemKind::GraphColoring => "greedy coloring",
            ProblemKind::HamiltonianCycle => "backtracking",
            ProblemKind::BinPacking => "first-fit decreasing",
            ProblemKind::Partitions => "dynamic programming",
        }
    }
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
