//! Property-based tests for [`ringchan::Ring::grow`] across every wrap
//! configuration, plus the occupancy and capacity invariants from
//! `src/invariants.rs` (INV-RING-01/02/03).

use proptest::prelude::*;
use ringchan::Ring;

/// Drains `r` into a `Vec<u8>` of first bytes, in pop order, leaving `r`
/// empty.
fn drain_first_bytes(r: &mut Ring) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; r.buffer_bytes()];
    while r.pop(&mut buf).is_ok() {
        out.push(buf[0]);
    }
    out
}

proptest! {
    /// INV-RING-03, every wrap configuration: push `pushes` items, pop
    /// `pops` of them (0 <= pops <= pushes <= capacity), push enough more to
    /// wrap `tail` past the end of the ring, then `grow()` and check that
    /// the surviving items pop back out in the order they were pushed.
    #[test]
    fn grow_preserves_order_for_any_wrap(
        initial_pushes in 1usize..16,
        pops in 0usize..16,
        refill in 0usize..16,
    ) {
        let capacity = 16usize;
        let mut r = Ring::new(capacity, 1);

        let pops = pops.min(initial_pushes);
        let refill = refill.min(capacity - (initial_pushes - pops));

        let mut next_value = 0u8;
        let mut expected = std::collections::VecDeque::new();

        for _ in 0..initial_pushes {
            let mut b = vec![next_value];
            r.push_try(&mut b).unwrap();
            expected.push_back(next_value);
            next_value = next_value.wrapping_add(1);
        }
        for _ in 0..pops {
            let mut out = vec![0u8];
            r.pop(&mut out).unwrap();
            let popped = expected.pop_front().unwrap();
            prop_assert_eq!(out[0], popped);
        }
        for _ in 0..refill {
            let mut b = vec![next_value];
            r.push_try(&mut b).unwrap();
            expected.push_back(next_value);
            next_value = next_value.wrapping_add(1);
        }

        let occupancy_before = r.len();
        r.grow();
        prop_assert_eq!(r.len(), occupancy_before);
        prop_assert!(r.capacity() >= capacity * 2);

        let popped = drain_first_bytes(&mut r);
        prop_assert_eq!(popped, expected.into_iter().collect::<Vec<_>>());
        prop_assert!(r.is_empty());
    }

    /// INV-RING-01 (bounded occupancy): for any sequence of push_try/pop
    /// calls, `0 <= len() <= capacity()` always holds, and pushes never
    /// succeed past capacity.
    #[test]
    fn occupancy_stays_within_bounds(
        ops in prop::collection::vec(prop::bool::ANY, 1..200),
    ) {
        let mut r = Ring::new(8, 1);
        for push in ops {
            if push {
                let _ = r.push_try(&mut vec![0u8]);
            } else {
                let _ = r.pop(&mut vec![0u8]);
            }
            prop_assert!(r.len() <= r.capacity() as u64);
        }
    }

    /// INV-RING-02 (power-of-two capacity): repeated `grow()` calls always
    /// leave `capacity()` a power of two, doubled each time.
    #[test]
    fn grow_keeps_capacity_a_power_of_two(grows in 0usize..6) {
        let mut r = Ring::new(4, 1);
        let mut expected = 4usize;
        for _ in 0..grows {
            r.grow();
            expected *= 2;
            prop_assert_eq!(r.capacity(), expected);
            prop_assert!(r.capacity().is_power_of_two());
        }
    }
}
