//! Concurrent adjacency store shared by every engine component.
//!
//! Nodes live in an arena of slots kept in insertion order. A concurrent
//! index maps each [`NodeId`] to its slot position, so the identifier space is
//! independent of the storage layout. Each slot owns a synchronised neighbour
//! map; the degree cache is a separate structure that only changes when it is
//! explicitly recomputed (or bumped by a generator) and may therefore be
//! observed stale.

mod invariants;
mod slot;

use std::{
    collections::{HashSet, btree_map::Entry},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use dashmap::{DashMap, mapref::entry::Entry as IndexEntry};
use rayon::prelude::*;

use crate::node::NodeId;

pub use invariants::SymmetryViolation;

use self::slot::{NeighbourMap, NodeSlot, lock_pair};

/// Structural flags of a [`GraphStore`].
///
/// # Examples
/// ```
/// use plexus_core::GraphConfig;
///
/// let config = GraphConfig::new().with_weighted(false);
/// assert!(!config.is_directed());
/// assert!(!config.is_weighted());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    directed: bool,
    weighted: bool,
}

impl GraphConfig {
    /// Returns the default configuration: undirected and weighted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            directed: false,
            weighted: true,
        }
    }

    /// Configuration used by the random graph generators.
    #[must_use]
    pub const fn unweighted() -> Self {
        Self::new().with_weighted(false)
    }

    /// Sets whether edges are directed.
    #[must_use]
    pub const fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Sets whether repeated edge insertions accumulate their weights.
    #[must_use]
    pub const fn with_weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Returns `true` when edges are directed.
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_directed(&self) -> bool { self.directed }

    /// Returns `true` when repeated insertions accumulate weights.
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_weighted(&self) -> bool { self.weighted }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an edge mutation.
///
/// Missing endpoints are not an error: the mutation is skipped and reported as
/// [`EdgeOutcome::MissingNode`]. Callers that do not care may ignore the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// A new adjacency entry was created.
    Inserted,
    /// The edge existed and its weight was increased.
    Accumulated,
    /// The edge existed and the store keeps the first weight seen.
    Unchanged,
    /// At least one endpoint is absent; nothing changed.
    MissingNode,
}

impl EdgeOutcome {
    /// Returns `true` when the call created a new edge.
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Concurrent graph keyed by [`NodeId`].
///
/// # Examples
/// ```
/// use plexus_core::{EdgeOutcome, GraphStore, NodeId};
///
/// let graph = GraphStore::new();
/// let (a, b) = (NodeId::new(0), NodeId::new(1));
/// graph.add_node(a);
/// assert_eq!(graph.add_undirected_edge(a, b, 1.0), EdgeOutcome::MissingNode);
/// graph.add_node(b);
/// assert_eq!(graph.add_undirected_edge(a, b, 1.0), EdgeOutcome::Inserted);
/// assert!(graph.has_edge(b, a));
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub struct GraphStore {
    config: GraphConfig,
    index: DashMap<NodeId, usize>,
    slots: RwLock<Vec<Arc<NodeSlot>>>,
    degrees: DashMap<NodeId, usize>,
}

impl GraphStore {
    /// Creates an empty undirected, weighted store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GraphConfig::new())
    }

    /// Creates an empty store with explicit structural flags.
    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            index: DashMap::new(),
            slots: RwLock::new(Vec::new()),
            degrees: DashMap::new(),
        }
    }

    /// Returns the structural flags of the store.
    #[rustfmt::skip]
    #[must_use]
    pub fn config(&self) -> GraphConfig { self.config }

    /// Returns `true` when edges are directed.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_directed(&self) -> bool { self.config.is_directed() }

    /// Returns `true` when repeated insertions accumulate weights.
    #[rustfmt::skip]
    #[must_use]
    pub fn is_weighted(&self) -> bool { self.config.is_weighted() }

    /// Inserts `id`, returning `true` when it was not yet present.
    pub fn add_node(&self, id: NodeId) -> bool {
        // The index shard stays locked while the slot is appended so two
        // writers racing on the same id cannot both allocate a slot.
        match self.index.entry(id) {
            IndexEntry::Occupied(_) => false,
            IndexEntry::Vacant(vacant) => {
                let mut slots = self.write_slots();
                let position = slots.len();
                slots.push(Arc::new(NodeSlot::new(id, position)));
                vacant.insert(position);
                true
            }
        }
    }

    /// Returns `true` when `id` is present.
    #[must_use]
    pub fn has_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of nodes in the store.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.read_slots().len()
    }

    /// Returns `true` when the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Snapshot of all node identifiers in insertion order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        self.read_slots().iter().map(|slot| slot.id()).collect()
    }

    /// Adds an edge between two existing nodes in both directions.
    ///
    /// Weighted stores accumulate `weight` onto an existing edge; unweighted
    /// stores keep the first weight seen.
    pub fn add_undirected_edge(&self, left: NodeId, right: NodeId, weight: f64) -> EdgeOutcome {
        let (Some(left_slot), Some(right_slot)) = (self.slot(left), self.slot(right)) else {
            return EdgeOutcome::MissingNode;
        };
        if left_slot.position() == right_slot.position() {
            let mut neighbours = left_slot.lock();
            return self.upsert(&mut neighbours, right, weight);
        }
        let (mut left_map, mut right_map) = lock_pair(&left_slot, &right_slot);
        let outcome = self.upsert(&mut left_map, right, weight);
        self.upsert(&mut right_map, left, weight);
        outcome
    }

    /// Adds an edge according to the store's orientation.
    ///
    /// Directed stores record only `source -> target`; undirected stores
    /// delegate to [`Self::add_undirected_edge`].
    pub fn add_edge(&self, source: NodeId, target: NodeId, weight: f64) -> EdgeOutcome {
        if !self.config.is_directed() {
            return self.add_undirected_edge(source, target, weight);
        }
        if !self.has_node(target) {
            return EdgeOutcome::MissingNode;
        }
        let Some(slot) = self.slot(source) else {
            return EdgeOutcome::MissingNode;
        };
        let mut neighbours = slot.lock();
        self.upsert(&mut neighbours, target, weight)
    }

    /// Removes the edge between `left` and `right` in both directions.
    ///
    /// Returns `true` when `left -> right` was present.
    pub fn remove_undirected_edge(&self, left: NodeId, right: NodeId) -> bool {
        let (Some(left_slot), Some(right_slot)) = (self.slot(left), self.slot(right)) else {
            return false;
        };
        if left_slot.position() == right_slot.position() {
            return left_slot.lock().remove(&right).is_some();
        }
        let (mut left_map, mut right_map) = lock_pair(&left_slot, &right_slot);
        right_map.remove(&left);
        left_map.remove(&right).is_some()
    }

    /// Returns `true` when `source` lists `target` as a neighbour.
    #[must_use]
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.slot(source)
            .is_some_and(|slot| slot.lock().contains_key(&target))
    }

    /// Weight stored on `source -> target`, if the edge exists.
    #[must_use]
    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Option<f64> {
        self.slot(source)
            .and_then(|slot| slot.lock().get(&target).copied())
    }

    /// Point-in-time copy of the neighbours of `node`, in ascending id order.
    ///
    /// Unknown nodes have no neighbours.
    #[must_use]
    pub fn neighbours(&self, node: NodeId) -> Vec<NodeId> {
        self.slot(node)
            .map(|slot| slot.lock().keys().copied().collect())
            .unwrap_or_default()
    }

    /// Point-in-time copy of the neighbours of `node` and their weights.
    #[must_use]
    pub fn weighted_neighbours(&self, node: NodeId) -> Vec<(NodeId, f64)> {
        self.slot(node)
            .map(|slot| {
                slot.lock()
                    .iter()
                    .map(|(neighbour, weight)| (*neighbour, *weight))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Neighbour set of `node`.
    #[must_use]
    pub fn neighbour_set(&self, node: NodeId) -> HashSet<NodeId> {
        self.slot(node)
            .map(|slot| slot.lock().keys().copied().collect())
            .unwrap_or_default()
    }

    /// Live number of neighbours of `node`, bypassing the degree cache.
    #[must_use]
    pub fn neighbour_count(&self, node: NodeId) -> usize {
        self.slot(node).map_or(0, |slot| slot.lock().len())
    }

    /// Sum of the weights on the edges leaving `node`.
    #[must_use]
    pub fn weighted_degree(&self, node: NodeId) -> f64 {
        self.slot(node)
            .map_or(0.0, |slot| slot.lock().values().sum())
    }

    /// Number of edges.
    ///
    /// Undirected stores count each pair once; self-loops are stored as a
    /// single entry and counted once.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let (entries, loops) = self
            .slot_list()
            .iter()
            .map(|slot| {
                let neighbours = slot.lock();
                let loops = usize::from(neighbours.contains_key(&slot.id()));
                (neighbours.len(), loops)
            })
            .fold((0, 0), |(entries, loops), (len, own)| {
                (entries + len, loops + own)
            });
        if self.config.is_directed() {
            entries
        } else {
            (entries + loops) / 2
        }
    }

    /// Cached degree of `node`.
    ///
    /// Returns `None` until [`Self::recompute_degree`] or
    /// [`Self::recompute_degrees`] has been called for the node. The cache is
    /// not maintained by edge mutations.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> Option<usize> {
        self.degrees.get(&node).map(|entry| *entry)
    }

    /// Refreshes the cached degree of `node` from its neighbour map.
    pub fn recompute_degree(&self, node: NodeId) -> Option<usize> {
        let degree = self.slot(node)?.lock().len();
        self.degrees.insert(node, degree);
        Some(degree)
    }

    /// Refreshes the cached degree of every node in parallel.
    #[tracing::instrument(name = "store.recompute_degrees", skip(self), fields(nodes = tracing::field::Empty))]
    pub fn recompute_degrees(&self) {
        let slots = self.slot_list();
        tracing::Span::current().record("nodes", slots.len());
        slots.par_iter().for_each(|slot| {
            let degree = slot.lock().len();
            self.degrees.insert(slot.id(), degree);
        });
    }

    pub(crate) fn set_degree(&self, node: NodeId, degree: usize) {
        self.degrees.insert(node, degree);
    }

    pub(crate) fn increment_degree(&self, node: NodeId) {
        *self.degrees.entry(node).or_insert(0) += 1;
    }

    /// Every adjacency entry as `(source, target, weight)`.
    ///
    /// Undirected edges appear once per direction. Sources follow insertion
    /// order and targets ascend within a source.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        self.adjacency()
            .into_iter()
            .flat_map(|(source, entries)| {
                entries
                    .into_iter()
                    .map(move |(target, weight)| (source, target, weight))
            })
            .collect()
    }

    /// Snapshot of every node with its weighted neighbour list.
    #[must_use]
    pub fn adjacency(&self) -> Vec<(NodeId, Vec<(NodeId, f64)>)> {
        self.slot_list()
            .iter()
            .map(|slot| {
                let entries = slot
                    .lock()
                    .iter()
                    .map(|(target, weight)| (*target, *weight))
                    .collect();
                (slot.id(), entries)
            })
            .collect()
    }

    /// Folds every node and adjacency entry of `other` into this store.
    ///
    /// Nodes missing here are appended in `other`'s insertion order. Matching
    /// entries accumulate weights in weighted stores and keep the existing
    /// weight otherwise.
    #[tracing::instrument(
        name = "store.merge",
        skip(self, other),
        fields(incoming_nodes = other.node_count())
    )]
    pub fn merge_from(&self, other: &Self) {
        let adjacency = other.adjacency();
        for (node, _) in &adjacency {
            self.add_node(*node);
        }
        adjacency.par_iter().for_each(|(node, entries)| {
            let Some(slot) = self.slot(*node) else {
                return;
            };
            let mut neighbours = slot.lock();
            for (target, weight) in entries {
                self.upsert(&mut neighbours, *target, *weight);
            }
        });
    }

    /// Copies the subgraph induced by `selection`.
    ///
    /// Unknown nodes in `selection` are ignored; the copy keeps the order of
    /// `selection` and this store's configuration.
    #[must_use]
    pub fn subgraph(&self, selection: &[NodeId]) -> Self {
        let keep: HashSet<NodeId> = selection
            .iter()
            .copied()
            .filter(|node| self.has_node(*node))
            .collect();
        let mut seen = HashSet::with_capacity(keep.len());
        let mut slots = Vec::with_capacity(keep.len());
        for node in selection {
            if !keep.contains(node) || !seen.insert(*node) {
                continue;
            }
            let neighbours: NeighbourMap = self
                .weighted_neighbours(*node)
                .into_iter()
                .filter(|(target, _)| keep.contains(target))
                .collect();
            slots.push((*node, neighbours));
        }
        Self::from_slots(self.config, slots)
    }

    fn from_slots(config: GraphConfig, entries: Vec<(NodeId, NeighbourMap)>) -> Self {
        let index = DashMap::with_capacity(entries.len());
        let slots = entries
            .into_iter()
            .enumerate()
            .map(|(position, (id, neighbours))| {
                index.insert(id, position);
                Arc::new(NodeSlot::with_neighbours(id, position, neighbours))
            })
            .collect();
        Self {
            config,
            index,
            slots: RwLock::new(slots),
            degrees: DashMap::new(),
        }
    }

    fn upsert(&self, neighbours: &mut NeighbourMap, target: NodeId, weight: f64) -> EdgeOutcome {
        match neighbours.entry(target) {
            Entry::Vacant(vacant) => {
                vacant.insert(weight);
                EdgeOutcome::Inserted
            }
            Entry::Occupied(mut occupied) => {
                if self.config.is_weighted() {
                    *occupied.get_mut() += weight;
                    EdgeOutcome::Accumulated
                } else {
                    EdgeOutcome::Unchanged
                }
            }
        }
    }

    fn slot(&self, id: NodeId) -> Option<Arc<NodeSlot>> {
        // Copy the position out before touching the arena lock; `add_node`
        // acquires the two locks in the opposite order.
        let position = *self.index.get(&id)?;
        self.read_slots().get(position).cloned()
    }

    fn slot_list(&self) -> Vec<Arc<NodeSlot>> {
        self.read_slots().clone()
    }

    fn read_slots(&self) -> RwLockReadGuard<'_, Vec<Arc<NodeSlot>>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, Vec<Arc<NodeSlot>>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GraphStore {
    /// Deep copy, including the degree cache.
    fn clone(&self) -> Self {
        let entries = self
            .slot_list()
            .iter()
            .map(|slot| (slot.id(), slot.lock().clone()))
            .collect();
        let copy = Self::from_slots(self.config, entries);
        for entry in &self.degrees {
            copy.degrees.insert(*entry.key(), *entry.value());
        }
        copy
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("config", &self.config)
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish_non_exhaustive()
    }
}
