//! Combinatorics Solver
//!
//! Six classic combinatorial problems solved exactly or heuristically and
//! served over an authenticated JSON API.
//!
//! # Solvers
//!
//! - [`tsp`](solvers::tsp): Shortest closed tour by exhaustive permutation search
//! - [`knapsack`](solvers::knapsack): 0/1 knapsack by dynamic programming
//! - [`graph_coloring`](solvers::graph_coloring): Greedy proper coloring
//! - [`hamiltonian`](solvers::hamiltonian): Backtracking cycle search
//! - [`bin_packing`](solvers::bin_packing): First-fit decreasing
//! - [`partitions`](solvers::partitions): Integer partition counting
//!
//! # Dispatch
//!
//! - [`api`]: Router, handlers and OpenAPI docs
//! - [`auth`]: OAuth login and sessions
//! - [`dto`]: Request validation and response shapes

pub mod api;
pub mod auth;
pub mod config;
pub mod console;
pub mod domain;
pub mod dto;
pub mod error;
pub mod solvers;
