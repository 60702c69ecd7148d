//! Debug assertion macros for ring-slab invariants.
//!
//! These mirror the invariants documented in `spec.md` §3/§8. They are only
//! active in debug builds (`#[cfg(debug_assertions)]`), so there is zero
//! overhead in release builds. Used by `region`, `alloc`, and `state`.

/// INV-CAP: sum of `node_cost(len)` over all live nodes never exceeds capacity.
///
/// Used in: `alloc::reserve*` after installing a node.
macro_rules! debug_assert_bounded_occupancy {
    ($used:expr, $capacity:expr) => {
        debug_assert!(
            $used <= $capacity,
            "INV-CAP violated: occupied {} exceeds capacity {}",
            $used,
            $capacity
        )
    };
}

/// INV-HT: HEAD absent iff TAIL absent iff the buffer is empty.
///
/// Used in: `region::RingBuffer::init`, `alloc::reserve*`, `state::commit`.
macro_rules! debug_assert_head_tail_parity {
    ($head:expr, $tail:expr) => {
        debug_assert!(
            ($head == crate::node::NIL) == ($tail == crate::node::NIL),
            "INV-HT violated: HEAD/TAIL disagree on emptiness (head={}, tail={})",
            $head,
            $tail
        )
    };
}

/// INV-RESV: if `oldest_reserve` is present, it must be `Writing` or `Committed`.
///
/// Used in: `state::consume`, `state::commit` discard paths.
macro_rules! debug_assert_oldest_reserve_state {
    ($state:expr) => {
        debug_assert!(
            !matches!($state, crate::node::NodeState::Reading),
            "INV-RESV violated: oldest_reserve points at a node in state Reading"
        )
    };
}

/// INV-POS: a node's position-forward neighbor must not equal itself unless
/// it is also its own position-backward neighbor (the sole-node self-link).
///
/// Used in: `node` accessors, `alloc::reserve_overwrite`.
macro_rules! debug_assert_self_link_consistent {
    ($forward:expr, $backward:expr, $at:expr) => {
        debug_assert!(
            ($forward == $at) == ($backward == $at),
            "INV-POS violated: node {} has asymmetric self-link (fwd={}, bwd={})",
            $at,
            $forward,
            $backward
        )
    };
}

pub(crate) use debug_assert_bounded_occupancy;
pub(crate) use debug_assert_head_tail_parity;
pub(crate) use debug_assert_oldest_reserve_state;
pub(crate) use debug_assert_self_link_consistent;
