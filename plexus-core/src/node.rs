//! Identifier newtypes for graph nodes and multilayer layers.

use std::fmt;

/// Opaque identifier of a node (or actor) in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new node identifier.
    ///
    /// # Examples
    /// ```
    /// use plexus_core::NodeId;
    ///
    /// let id = NodeId::new(2);
    /// assert_eq!(id.get(), 2);
    /// ```
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a layer within a [`crate::MultilayerGraph`].
///
/// Layers loaded from temporal sources use the year or window index as their
/// identifier, so ordering follows time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LayerId(u64);

impl LayerId {
    /// Creates a new layer identifier.
    ///
    /// # Examples
    /// ```
    /// use plexus_core::LayerId;
    ///
    /// assert_eq!(LayerId::new(1998).get(), 1998);
    /// ```
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

impl From<u64> for LayerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
