//! Integer partition counting.

use crate::error::{Result, SolverError};

/// Counts the ways to write `number` as an unordered sum of positive integers.
///
/// Parts are introduced one size at a time, so each multiset of parts is
/// counted exactly once. Counts past `u128::MAX` (from roughly `number =
/// 1450`) are rejected.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::solvers::partitions;
///
/// assert_eq!(partitions::count(0).unwrap(), 1);
/// assert_eq!(partitions::count(4).unwrap(), 5);
/// assert_eq!(partitions::count(10).unwrap(), 42);
/// ```
pub fn count(number: u64) -> Result<u128> {
    let n = usize::try_from(number)
        .map_err(|_| SolverError::invalid(format!("Number {} is too large", number)))?;

    let mut partition_counts = vec![0u128; n + 1];
    partition_counts[0] = 1;

    for part in 1..=n {
        for target in part..=n {
            partition_counts[target] = partition_counts[target]
                .checked_add(partition_counts[target - part])
                .ok_or_else(|| {
                    SolverError::invalid(format!(
                        "Partition count of {} exceeds the supported range",
                        number
                    ))
                })?;
        }
    }

    Ok(partition_counts[n])
}
