//! Debug assertion macros for the ring and channel invariants.
//!
//! Active only in debug builds (`debug_assert!`), so there is zero overhead
//! in release builds. Used by both `ring.rs` and `channel.rs`.

// =============================================================================
// INV-RING-01: Bounded occupancy
// =============================================================================

/// Assert `0 <= head - tail <= capacity`.
///
/// Used in: `Ring::push_try`, `Ring::pop` after adjusting the counters.
macro_rules! debug_assert_bounded_occupancy {
    ($head:expr, $tail:expr, $capacity:expr) => {
        debug_assert!(
            $head.wrapping_sub($tail) <= $capacity as u64,
            "INV-RING-01 violated: occupancy {} exceeds capacity {}",
            $head.wrapping_sub($tail),
            $capacity
        )
    };
}

// =============================================================================
// INV-RING-02: Power-of-two capacity
// =============================================================================

/// Assert the ring's capacity is a non-zero power of two.
///
/// Used in: `Ring::new`, `Ring::grow` after doubling.
macro_rules! debug_assert_power_of_two {
    ($capacity:expr) => {
        debug_assert!(
            $capacity > 0 && ($capacity & ($capacity - 1)) == 0,
            "INV-RING-02 violated: capacity {} is not a power of two",
            $capacity
        )
    };
}

// =============================================================================
// INV-RING-03: Grow preserves occupancy
// =============================================================================

/// Assert that `grow()` did not change the number of enqueued items.
///
/// Used in: `Ring::grow`, comparing occupancy before and after.
macro_rules! debug_assert_occupancy_preserved {
    ($before:expr, $after:expr) => {
        debug_assert!(
            $before == $after,
            "INV-RING-03 violated: grow() changed occupancy from {} to {}",
            $before,
            $after
        )
    };
}

// =============================================================================
// INV-CH-01: Reference accounting
// =============================================================================

/// Assert `ref_count >= nreaders + nwriters`.
///
/// Used in: `Shared::open`, `Shared::close`, while holding the lock.
macro_rules! debug_assert_ref_count_bounds {
    ($ref_count:expr, $nreaders:expr, $nwriters:expr) => {
        debug_assert!(
            $ref_count >= $nreaders + $nwriters,
            "INV-CH-01 violated: ref_count {} < nreaders {} + nwriters {}",
            $ref_count,
            $nreaders,
            $nwriters
        )
    };
}

// =============================================================================
// INV-CH-02: Flush only while writer-less
// =============================================================================

/// Assert `flush == true` implies `nwriters == 0`.
///
/// Used in: `Shared::close` right after setting `flush`.
macro_rules! debug_assert_flush_implies_no_writers {
    ($flush:expr, $nwriters:expr) => {
        debug_assert!(
            !$flush || $nwriters == 0,
            "INV-CH-02 violated: flush set while nwriters = {}",
            $nwriters
        )
    };
}

pub(crate) use debug_assert_bounded_occupancy;
pub(crate) use debug_assert_flush_implies_no_writers;
pub(crate) use debug_assert_occupancy_preserved;
pub(crate) use debug_assert_power_of_two;
pub(crate) use debug_assert_ref_count_bounds;
