//! Scene nodes: handles, the arena that owns them, and their behavior.

mod id;
mod tree;
mod widget;

pub use id::NodeId;
pub use tree::{NodeData, SceneTree};
pub use widget::{Block, DrawCx, EventCx, Widget};
