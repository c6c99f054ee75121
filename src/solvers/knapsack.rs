//! 0/1 knapsack by table dynamic programming.

use serde::Serialize;

use crate::domain::Item;
use crate::error::{Result, SolverError};

/// Optimal knapsack value and one packing that reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnapsackSolution {
    pub max_value: u64,
    /// Indices of the packed items, ascending.
    pub selected: Vec<usize>,
}

/// Maximizes total value with each item used at most once.
///
/// `dp[i][w]` is the best value using the first `i` items within capacity
/// `w`. Row 0 is all zeros and the answer is `dp[n][capacity]`.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::domain::Item;
/// use combinatorics_solver::solvers::knapsack;
///
/// let items = [Item::new(2, 3), Item::new(3, 4), Item::new(4, 5)];
/// let solution = knapsack::solve(&items, 5).unwrap();
/// assert_eq!(solution.max_value, 7);
/// assert_eq!(solution.selected, vec![0, 1]);
/// ```
pub fn solve(items: &[Item], capacity: usize) -> Result<KnapsackSolution> {
    let n = items.len();
    let mut dp = vec![vec![0u64; capacity + 1]; n + 1];

    for i in 1..=n {
        let item = items[i - 1];
        for w in 0..=capacity {
            dp[i][w] = match usize::try_from(item.weight) {
                Ok(weight) if weight <= w => {
                    let with_item = dp[i - 1][w - weight].checked_add(item.value).ok_or_else(|| {
                        SolverError::invalid("Total item value exceeds the supported range")
                    })?;
                    dp[i - 1][w].max(with_item)
                }
                _ => dp[i - 1][w],
            };
        }
    }

    Ok(KnapsackSolution {
        max_value: dp[n][capacity],
        selected: reconstruct(&dp, items, capacity),
    })
}

/// Walks the table backwards to recover which items were taken.
fn reconstruct(dp: &[Vec<u64>], items: &[Item], capacity: usize) -> Vec<usize> {
    let mut selected = Vec::new();
    let mut w = capacity;
    for i in (1..=items.len()).rev() {
        if dp[i][w] != dp[i - 1][w] {
            selected.push(i - 1);
            // A differing cell means the item fit, so its weight is <= w.
            w -= items[i - 1].weight as usize;
        }
    }
    selected.reverse();
    selected
}
