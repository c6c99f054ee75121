//! Traveling salesman by exhaustive permutation search.
//!
//! Every ordering of the cities is evaluated as a closed tour, so the result
//! is exact and the running time is factorial. Callers are expected to bound
//! the instance size.

use serde::Serialize;

use crate::domain::City;
use crate::error::{Result, SolverError};

/// The best closed tour found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    /// City indices in visiting order. The return to `route[0]` is implied.
    pub route: Vec<usize>,
    /// Sum of consecutive distances plus the closing edge.
    pub length: f64,
}

/// Length of the closed tour visiting `cities` in `route` order.
///
/// ```
/// use combinatorics_solver::domain::City;
/// use combinatorics_solver::solvers::tsp::tour_length;
///
/// let cities = vec![City::new(vec![0.0, 0.0]), City::new(vec![3.0, 4.0])];
/// assert!((tour_length(&cities, &[0, 1]) - 10.0).abs() < 1e-10);
/// assert_eq!(tour_length(&cities, &[]), 0.0);
/// ```
pub fn tour_length(cities: &[City], route: &[usize]) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let open: f64 = route
        .windows(2)
        .map(|pair| cities[pair[0]].distance_to(&cities[pair[1]]))
        .sum();
    open + cities[last].distance_to(&cities[first])
}

/// Finds the shortest closed tour over all permutations.
///
/// Permutations are visited in lexicographic order and only a strictly
/// shorter tour replaces the incumbent, so ties resolve to the first
/// minimal permutation.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::domain::City;
/// use combinatorics_solver::solvers::tsp;
///
/// let square = vec![
///     City::new(vec![0.0, 0.0]),
///     City::new(vec![1.0, 1.0]),
///     City::new(vec![1.0, 0.0]),
///     City::new(vec![0.0, 1.0]),
/// ];
/// let tour = tsp::solve(&square).unwrap();
/// assert_eq!(tour.route, vec![0, 2, 1, 3]);
/// assert!((tour.length - 4.0).abs() < 1e-10);
/// ```
pub fn solve(cities: &[City]) -> Result<Tour> {
    if cities.is_empty() {
        return Err(SolverError::invalid("City list must not be empty"));
    }

    let mut permutation: Vec<usize> = (0..cities.len()).collect();
    let mut best = Tour {
        length: tour_length(cities, &permutation),
        route: permutation.clone(),
    };

    while next_permutation(&mut permutation) {
        let length = tour_length(cities, &permutation);
        if length < best.length {
            best.length = length;
            best.route.copy_from_slice(&permutation);
        }
    }

    Ok(best)
}

/// Advances `perm` to the next lexicographic permutation in place.
///
/// Returns `false` once `perm` was the last (descending) permutation.
fn next_permutation(perm: &mut [usize]) -> bool {
    if perm.len() < 2 {
        return false;
    }

    let Some(pivot) = (0..perm.len() - 1).rev().find(|&i| perm[i] < perm[i + 1]) else {
        return false;
    };
    let successor = (pivot + 1..perm.len())
        .rev()
        .find(|&j| perm[j] > perm[pivot])
        .unwrap_or(pivot + 1);

    perm.swap(pivot, successor);
    perm[pivot + 1..].reverse();
    true
}
