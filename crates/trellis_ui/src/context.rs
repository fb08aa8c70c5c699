//! Focus and hover registries.
//!
//! Each registry holds at most one node. Changing the holder produces a
//! "left" notification for the previous node followed by an "entered"
//! notification for the new one. Notifications are queued on the
//! [`SceneTree`] and delivered to the widgets by the [`Scene`](crate::Scene)
//! once no other hook is running.

use crate::error::{SceneError, SceneResult};
use crate::node::{NodeId, SceneTree};

/// A hook call waiting for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
    Focus { node: NodeId, focused: bool },
    Hover { node: NodeId, hovered: bool },
    Visibility { node: NodeId, hidden: bool },
}

impl Notification {
    pub(crate) const fn node(self) -> NodeId {
        match self {
            Self::Focus { node, .. } | Self::Hover { node, .. } | Self::Visibility { node, .. } => {
                node
            }
        }
    }
}

/// A change of holder in a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Previous holder, notified first.
    pub left: Option<NodeId>,
    /// New holder, notified second.
    pub entered: Option<NodeId>,
}

/// Holds the node with keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusManager {
    current: Option<NodeId>,
}

impl FocusManager {
    /// The focused node, if any.
    #[must_use]
    pub const fn get(&self) -> Option<NodeId> {
        self.current
    }

    /// Replaces the holder. Returns `None` when `node` already holds focus.
    pub fn set(&mut self, node: Option<NodeId>) -> Option<Transition> {
        swap_holder(&mut self.current, node)
    }
}

/// Holds the node under the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverManager {
    current: Option<NodeId>,
}

impl HoverManager {
    /// The hovered node, if any.
    #[must_use]
    pub const fn get(&self) -> Option<NodeId> {
        self.current
    }

    /// Replaces the holder. Returns `None` when `node` is already hovered.
    pub fn set(&mut self, node: Option<NodeId>) -> Option<Transition> {
        swap_holder(&mut self.current, node)
    }
}

fn swap_holder(slot: &mut Option<NodeId>, node: Option<NodeId>) -> Option<Transition> {
    if *slot == node {
        return None;
    }
    let left = std::mem::replace(slot, node);
    Some(Transition {
        left,
        entered: node,
    })
}

/// Interaction state shared by every node of a scene.
#[derive(Debug, Clone, Default)]
pub struct UiContext {
    focus: FocusManager,
    hover: HoverManager,
    close_requested: bool,
}

impl UiContext {
    /// Creates a context with nothing focused or hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The focus registry.
    #[must_use]
    pub const fn focus(&self) -> &FocusManager {
        &self.focus
    }

    /// The hover registry.
    #[must_use]
    pub const fn hover(&self) -> &HoverManager {
        &self.hover
    }

    /// Moves focus and queues the left/entered notifications on `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live in `tree`.
    pub fn set_focus(&mut self, tree: &mut SceneTree, node: Option<NodeId>) -> SceneResult<()> {
        check_live(tree, node)?;
        if let Some(transition) = self.focus.set(node) {
            tracing::debug!(left = ?transition.left, entered = ?transition.entered, "focus changed");
            queue(tree, transition, |node, focused| Notification::Focus { node, focused });
        }
        Ok(())
    }

    /// Moves hover and queues the left/entered notifications on `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live in `tree`.
    pub fn set_hover(&mut self, tree: &mut SceneTree, node: Option<NodeId>) -> SceneResult<()> {
        check_live(tree, node)?;
        if let Some(transition) = self.hover.set(node) {
            tracing::trace!(left = ?transition.left, entered = ?transition.entered, "hover changed");
            queue(tree, transition, |node, hovered| Notification::Hover { node, hovered });
        }
        Ok(())
    }

    /// Clears focus and hover if they point at any of the `removed` nodes.
    /// Destroyed nodes get no notification.
    pub fn forget(&mut self, removed: &[NodeId]) {
        if self.focus.get().is_some_and(|id| removed.contains(&id)) {
            self.focus.current = None;
        }
        if self.hover.get().is_some_and(|id| removed.contains(&id)) {
            self.hover.current = None;
        }
    }

    /// Asks the frame loop to stop after the current iteration.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// True if a close was requested.
    #[must_use]
    pub const fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Returns the close request and clears it.
    pub fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }
}

fn check_live(tree: &SceneTree, node: Option<NodeId>) -> SceneResult<()> {
    match node {
        Some(id) if !tree.contains(id) => Err(SceneError::StaleNode(id)),
        _ => Ok(()),
    }
}

fn queue(tree: &mut SceneTree, transition: Transition, make: fn(NodeId, bool) -> Notification) {
    if let Some(left) = transition.left {
        tree.notify(make(left, false));
    }
    if let Some(entered) = transition.entered {
        tree.notify(make(entered, true));
    }
}
