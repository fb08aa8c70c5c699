//! # Node Handles
//!
//! A node handle is an index into the scene arena plus a generation
//! counter. Destroying a node bumps the generation of its slot, so handles
//! kept by focus, hover or user code can never reach a node that later
//! reuses the same slot.

use std::fmt;

/// Generational handle to a node in a [`SceneTree`](super::SceneTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}
