//! Per-node storage slots for the graph arena.
//!
//! Every slot owns its neighbour map behind its own mutex, so writers touching
//! disjoint nodes never contend. Operations that touch two slots acquire the
//! locks in ascending slot position, which keeps concurrent writers
//! deadlock-free regardless of the argument order callers use.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::node::NodeId;

pub(super) type NeighbourMap = BTreeMap<NodeId, f64>;

pub(super) struct NodeSlot {
    id: NodeId,
    position: usize,
    neighbours: Mutex<NeighbourMap>,
}

impl NodeSlot {
    pub(super) fn new(id: NodeId, position: usize) -> Self {
        Self {
            id,
            position,
            neighbours: Mutex::new(BTreeMap::new()),
        }
    }

    pub(super) fn with_neighbours(id: NodeId, position: usize, neighbours: NeighbourMap) -> Self {
        Self {
            id,
            position,
            neighbours: Mutex::new(neighbours),
        }
    }

    #[rustfmt::skip]
    pub(super) fn id(&self) -> NodeId { self.id }

    #[rustfmt::skip]
    pub(super) fn position(&self) -> usize { self.position }

    /// Locks the neighbour map.
    ///
    /// A poisoned guard is recovered: each map entry is written in a single
    /// statement, so a panicking writer cannot leave a half-applied entry.
    pub(super) fn lock(&self) -> MutexGuard<'_, NeighbourMap> {
        self.neighbours
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Locks two distinct slots in slot order and returns the guards in argument
/// order.
pub(super) fn lock_pair<'a>(
    left: &'a NodeSlot,
    right: &'a NodeSlot,
) -> (MutexGuard<'a, NeighbourMap>, MutexGuard<'a, NeighbourMap>) {
    let (first, second) = lock_order(left.position(), right.position());
    if first == left.position() && second == right.position() {
        let left_guard = left.lock();
        let right_guard = right.lock();
        (left_guard, right_guard)
    } else {
        let right_guard = right.lock();
        let left_guard = left.lock();
        (left_guard, right_guard)
    }
}

fn lock_order(first: usize, second: usize) -> (usize, usize) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}
