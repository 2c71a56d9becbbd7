//!
//! Capacity limits and the growth policy of object buffers.
//!
//! Capacities are bounded so that every index of a buffer fits in a signed 32-bit integer.
//!

use crate::error::{ErrorKind, Result};

/// The largest capacity a buffer may have.
pub const MAX_CAPACITY: usize = i32::MAX as usize;

/// Past this capacity, buffers grow additively instead of doubling.
pub const GROWTH_THRESHOLD: usize = 1 << (i32::BITS / 2);

/// Check that a capacity lies within `(0, MAX_CAPACITY]`.
pub fn check(capacity: usize) -> Result<()> {
    crate::expect!(
        capacity > 0 && capacity <= MAX_CAPACITY,
        ErrorKind::InvalidCapacity,
        "Invalid capacity [{}]! Capacity must be in (0, {}].",
        capacity,
        MAX_CAPACITY
    );
    Ok(())
}

/// Compute the capacity a buffer of capacity `current` should grow to in order to hold at least
/// `requested` elements.
///
/// Starting from 1, the capacity doubles while it is below [`GROWTH_THRESHOLD`] and then grows by
/// [`GROWTH_THRESHOLD`] at a time, clamped to [`MAX_CAPACITY`]. If `current` is already large
/// enough, it is returned unchanged.
pub fn grow(current: usize, requested: usize) -> Result<usize> {
    check(requested)?;
    if current >= requested {
        return Ok(current);
    }
    let target = if requested <= GROWTH_THRESHOLD {
        requested.next_power_of_two()
    } else {
        let steps = (requested - 1) / GROWTH_THRESHOLD + 1;
        steps.saturating_mul(GROWTH_THRESHOLD)
    };
    Ok(target.min(MAX_CAPACITY))
}
