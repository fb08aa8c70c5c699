//! # TRELLIS UI Scene Graph
//!
//! Retained-mode node tree for 2D interfaces:
//! - Nodes with relative rectangles, z-order and visibility
//! - Top-down pointer hit-testing, bottom-up keyboard bubbling
//! - Single focus and hover holders with left/entered notifications
//! - Clipped, optionally culled, painter's-order rendering
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      UI PIPELINE                       │
//! ├────────────────────────────────────────────────────────┤
//! │  InputEvent → Scene::dispatch → hooks → notifications  │
//! │                                                        │
//! │  Scene::render → Surface (CommandBuffer) → present     │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Nodes live in a generational arena ([`SceneTree`]) and are addressed by
//! [`NodeId`]. Behavior is attached per node as a boxed [`Widget`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod context;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod node;
pub mod render;
pub mod scene;
pub mod style;

#[cfg(test)]
mod testing;

pub use context::{FocusManager, HoverManager, Transition, UiContext};
pub use dispatch::default_pointer_press;
pub use error::{SceneError, SceneResult};
pub use event::{
    InputEvent, Key, KeyEvent, KeyKind, Modifiers, MouseButton, PointerEvent, PointerKind,
    TextEvent,
};
pub use geometry::{Point, Rect, Size};
pub use input::{ClickSettings, InputState};
pub use node::{Block, DrawCx, EventCx, NodeData, NodeId, SceneTree, Widget};
pub use render::{CommandBuffer, RenderCommand, RenderStats, Surface};
pub use scene::Scene;
pub use style::Color;
