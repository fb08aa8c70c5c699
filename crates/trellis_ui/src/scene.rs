//! # Scene
//!
//! The scene bundles the node tree with its interaction state and is the
//! entry point for dispatch and render traversals.
//!
//! ```text
//! Scene
//!  ├─ SceneTree   nodes, topology, queued notifications
//!  ├─ UiContext   focus, hover, close request
//!  └─ root        where traversals start
//! ```

use crate::context::{Notification, UiContext};
use crate::error::{SceneError, SceneResult};
use crate::geometry::Rect;
use crate::node::{Block, EventCx, NodeId, SceneTree, Widget};

/// Upper bound on notifications delivered by one flush. A hook that keeps
/// moving focus from its own focus hook would otherwise never settle.
const MAX_NOTIFICATIONS_PER_FLUSH: usize = 1024;

/// A node tree plus the focus/hover context it is dispatched against.
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) tree: SceneTree,
    pub(crate) ui: UiContext,
    root: Option<NodeId>,
}

impl Scene {
    /// Creates an empty scene without a root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scene whose root is `widget` covering `rect`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ArenaFull`] if the node cannot be allocated.
    pub fn with_root(rect: Rect, widget: Box<dyn Widget>) -> SceneResult<Self> {
        let mut scene = Self::new();
        let root = scene.tree.insert(rect, None, 0, widget)?;
        scene.root = Some(root);
        Ok(scene)
    }

    /// The node traversals start from.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root.filter(|&root| self.tree.contains(root))
    }

    /// Makes `node` the traversal root.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn set_root(&mut self, node: NodeId) -> SceneResult<()> {
        self.tree.data(node)?;
        self.root = Some(node);
        Ok(())
    }

    pub(crate) fn require_root(&self) -> SceneResult<NodeId> {
        self.root().ok_or(SceneError::NoRoot)
    }

    /// The node tree.
    #[must_use]
    pub const fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// The node tree, mutably. Visibility changes made through it are
    /// delivered at the next flush or traversal.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// The focus/hover context.
    #[must_use]
    pub const fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// Creates a node. See [`SceneTree::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `parent` is not live.
    pub fn insert(
        &mut self,
        rect: Rect,
        parent: Option<NodeId>,
        z_index: i32,
        widget: Box<dyn Widget>,
    ) -> SceneResult<NodeId> {
        self.tree.insert(rect, parent, z_index, widget)
    }

    /// Creates a plain [`Block`] node.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `parent` is not live.
    pub fn insert_block(
        &mut self,
        rect: Rect,
        parent: Option<NodeId>,
        z_index: i32,
    ) -> SceneResult<NodeId> {
        self.tree.insert(rect, parent, z_index, Box::new(Block))
    }

    /// Destroys `node` and its subtree, clearing focus and hover if they
    /// pointed into it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn destroy(&mut self, node: NodeId) -> SceneResult<()> {
        let removed = self.tree.destroy(node)?;
        self.ui.forget(&removed);
        if self.root.is_some_and(|root| removed.contains(&root)) {
            self.root = None;
        }
        Ok(())
    }

    /// Hides `node` and its descendants, firing their visibility hooks.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn hide(&mut self, node: NodeId) -> SceneResult<()> {
        self.tree.hide(node)?;
        self.flush_notifications();
        Ok(())
    }

    /// Shows `node` and its descendants, firing their visibility hooks.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn show(&mut self, node: NodeId) -> SceneResult<()> {
        self.tree.show(node)?;
        self.flush_notifications();
        Ok(())
    }

    /// The focused node, if any.
    #[must_use]
    pub const fn focus(&self) -> Option<NodeId> {
        self.ui.focus().get()
    }

    /// Moves keyboard focus and delivers the left/entered hooks.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn set_focus(&mut self, node: Option<NodeId>) -> SceneResult<()> {
        self.ui.set_focus(&mut self.tree, node)?;
        self.flush_notifications();
        Ok(())
    }

    /// The hovered node, if any.
    #[must_use]
    pub const fn hovered(&self) -> Option<NodeId> {
        self.ui.hover().get()
    }

    /// Moves hover and delivers the left/entered hooks.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`] if `node` is not live.
    pub fn set_hover(&mut self, node: Option<NodeId>) -> SceneResult<()> {
        self.ui.set_hover(&mut self.tree, node)?;
        self.flush_notifications();
        Ok(())
    }

    /// Asks the frame loop to stop after the current iteration.
    pub fn request_close(&mut self) {
        self.ui.request_close();
    }

    /// Returns a pending close request and clears it.
    pub fn take_close_request(&mut self) -> bool {
        self.ui.take_close_request()
    }

    /// Runs `f` against the widget of `node` with an event context over the
    /// rest of the scene. Returns `None` if the node is dead or its widget is
    /// already in use further up the stack.
    pub(crate) fn with_widget<R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut EventCx<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.tree.take_widget(node)?;
        let result = {
            let mut cx = EventCx::new(&mut self.tree, &mut self.ui, node);
            f(widget.as_mut(), &mut cx)
        };
        self.tree.restore_widget(node, widget);
        Some(result)
    }

    /// Delivers queued focus, hover and visibility hooks in the order they
    /// were produced, including any queued by the hooks themselves.
    pub fn flush_notifications(&mut self) {
        let mut delivered = 0;
        while let Some(notification) = self.tree.pop_notification() {
            if delivered == MAX_NOTIFICATIONS_PER_FLUSH {
                let dropped = self.tree.discard_notifications() + 1;
                tracing::warn!(dropped, "notification cascade did not settle, dropping the rest");
                return;
            }
            delivered += 1;

            let node = notification.node();
            self.with_widget(node, |widget, cx| {
                tracing::trace!(%node, name = widget.name(), ?notification, "notify");
                match notification {
                    Notification::Focus { focused, .. } => widget.on_focus_changed(cx, focused),
                    Notification::Hover { hovered, .. } => widget.on_hover_changed(cx, hovered),
                    Notification::Visibility { hidden, .. } => {
                        widget.on_visibility_changed(cx, hidden);
                    }
                }
            });
        }
    }
}
