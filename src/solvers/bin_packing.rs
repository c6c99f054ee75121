//! Bin packing with the first-fit-decreasing heuristic.

use serde::Serialize;

use crate::error::{Result, SolverError};

/// One bin: the item sizes it holds plus their running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    items: Vec<f64>,
    #[serde(skip)]
    load: f64,
}

impl Bin {
    fn with_item(item: f64) -> Self {
        Self {
            items: vec![item],
            load: item,
        }
    }

    fn fits(&self, item: f64, capacity: f64) -> bool {
        self.load + item <= capacity
    }

    fn push(&mut self, item: f64) {
        self.items.push(item);
        self.load += item;
    }

    pub fn items(&self) -> &[f64] {
        &self.items
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn into_items(self) -> Vec<f64> {
        self.items
    }
}

/// Packs `items` into bins of size `capacity`.
///
/// Items are sorted largest first. Each one goes into the earliest-created
/// bin with room left, or into a new bin when none fits. The result is not
/// guaranteed to use the minimum number of bins.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::solvers::bin_packing;
///
/// let bins = bin_packing::solve(&[4.0, 8.0, 1.0, 4.0, 2.0, 1.0], 10.0).unwrap();
/// assert_eq!(bins.len(), 2);
/// assert_eq!(bins[0].items(), &[8.0, 2.0][..]);
/// assert_eq!(bins[1].items(), &[4.0, 4.0, 1.0, 1.0][..]);
///
/// assert!(bin_packing::solve(&[1.0], 0.0).is_err());
/// ```
pub fn solve(items: &[f64], capacity: f64) -> Result<Vec<Bin>> {
    if items.is_empty() {
        return Err(SolverError::invalid("Item list must not be empty"));
    }
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(SolverError::invalid(format!(
            "Bin capacity must be a positive number, got {}",
            capacity
        )));
    }
    if let Some(bad) = items.iter().find(|&&item| !item.is_finite() || item < 0.0) {
        return Err(SolverError::invalid(format!(
            "Item sizes must be non-negative numbers, got {}",
            bad
        )));
    }
    if let Some(oversized) = items.iter().find(|&&item| item > capacity) {
        return Err(SolverError::invalid(format!(
            "Item of size {} exceeds bin capacity {}",
            oversized, capacity
        )));
    }

    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut bins: Vec<Bin> = Vec::new();
    for item in sorted {
        match bins.iter_mut().find(|bin| bin.fits(item, capacity)) {
            Some(bin) => bin.push(item),
            None => bins.push(Bin::with_item(item)),
        }
    }

    Ok(bins)
}
