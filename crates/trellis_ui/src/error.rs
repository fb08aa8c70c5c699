//! # Scene Error Types
//!
//! All errors that can occur while mutating the scene tree.

use thiserror::Error;

use crate::node::NodeId;

/// Errors that can occur in scene-tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle refers to a destroyed node, or was never issued by this tree.
    #[error("stale node handle: {0}")]
    StaleNode(NodeId),

    /// The requested parent is the node itself or one of its descendants.
    #[error("cannot attach {child} under {parent}: it would create a cycle")]
    WouldCycle {
        /// The node that was being attached.
        child: NodeId,
        /// The requested parent.
        parent: NodeId,
    },

    /// Every slot index is in use.
    #[error("node arena is full")]
    ArenaFull,

    /// The scene has no root node to dispatch into or render from.
    #[error("scene has no root node")]
    NoRoot,
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
