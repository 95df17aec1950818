//! Symmetry invariant for undirected stores.
//!
//! Every adjacency entry `(u, v, w)` of an undirected store must have a
//! matching `(v, u, w)`, and every neighbour must itself be a node.

use thiserror::Error;
use tracing::{debug, instrument};

use super::GraphStore;
use crate::node::NodeId;

/// A broken symmetry guarantee detected by [`GraphStore::check_symmetry`].
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum SymmetryViolation {
    /// `origin` lists `target` but not the other way round.
    #[error("node {origin} lists {target} as a neighbour, but the backlink is missing")]
    MissingBacklink {
        /// Node holding the one-sided entry.
        origin: NodeId,
        /// Neighbour lacking the reverse entry.
        target: NodeId,
    },
    /// Both directions exist with different weights.
    #[error("edge {origin} -> {target} has weight {forward} but the backlink has {backward}")]
    WeightMismatch {
        /// Node holding the forward entry.
        origin: NodeId,
        /// Neighbour holding the reverse entry.
        target: NodeId,
        /// Weight stored on `origin -> target`.
        forward: f64,
        /// Weight stored on `target -> origin`.
        backward: f64,
    },
    /// A neighbour entry points at a node that was never added.
    #[error("node {origin} references unknown node {target}")]
    DanglingNeighbour {
        /// Node holding the entry.
        origin: NodeId,
        /// Referenced identifier.
        target: NodeId,
    },
}

impl GraphStore {
    /// Verifies that every adjacency entry is mirrored with the same weight.
    ///
    /// Directed stores only check for dangling neighbours.
    ///
    /// # Errors
    /// Returns the first [`SymmetryViolation`] found, scanning nodes in
    /// insertion order.
    #[instrument(name = "store.check_symmetry", skip(self), err)]
    pub fn check_symmetry(&self) -> Result<(), SymmetryViolation> {
        for (origin, target, forward) in self.edges() {
            if !self.has_node(target) {
                return Err(SymmetryViolation::DanglingNeighbour { origin, target });
            }
            if self.is_directed() {
                continue;
            }
            match self.edge_weight(target, origin) {
                None => {
                    debug!(%origin, %target, "missing backlink");
                    return Err(SymmetryViolation::MissingBacklink { origin, target });
                }
                Some(backward) if backward.to_bits() != forward.to_bits() => {
                    return Err(SymmetryViolation::WeightMismatch {
                        origin,
                        target,
                        forward,
                        backward,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
