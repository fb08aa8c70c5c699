//! Per-node behavior: the draw and input hooks.

use crate::context::UiContext;
use crate::dispatch::default_pointer_press;
use crate::error::SceneResult;
use crate::event::{KeyEvent, PointerEvent, TextEvent};
use crate::geometry::Rect;
use crate::render::Surface;

use super::{NodeId, SceneTree};

/// Behavior attached to a node.
///
/// Every hook has a default. Overrides that still want the default focus
/// and propagation behavior must call the default explicitly; for presses
/// that is [`default_pointer_press`].
///
/// Hooks run on the UI thread and must return promptly. A panicking hook
/// unwinds out of the frame loop.
pub trait Widget {
    /// Short name used in traces.
    fn name(&self) -> &'static str {
        "block"
    }

    /// Paints the node. Called once per frame unless the node is hidden.
    fn on_draw(&mut self, _cx: &mut DrawCx<'_>) {}

    /// A button went down over this node or one of its descendants.
    fn on_pointer_press(&mut self, cx: &mut EventCx<'_>, event: &mut PointerEvent) {
        default_pointer_press(cx, event);
    }

    /// A button went up over this node or one of its descendants.
    fn on_pointer_release(&mut self, _cx: &mut EventCx<'_>, _event: &mut PointerEvent) {}

    /// The pointer moved over this node or one of its descendants.
    fn on_pointer_move(&mut self, _cx: &mut EventCx<'_>, _event: &mut PointerEvent) {}

    /// The wheel scrolled over this node or one of its descendants.
    fn on_wheel(&mut self, _cx: &mut EventCx<'_>, _event: &mut PointerEvent) {}

    /// A key went down while this node or a descendant had focus.
    fn on_key_press(&mut self, _cx: &mut EventCx<'_>, _event: &mut KeyEvent) {}

    /// A key went up while this node or a descendant had focus.
    fn on_key_release(&mut self, _cx: &mut EventCx<'_>, _event: &mut KeyEvent) {}

    /// Text was committed while this node or a descendant had focus.
    fn on_text_input(&mut self, _cx: &mut EventCx<'_>, _event: &mut TextEvent) {}

    /// Focus entered (`true`) or left (`false`) this node.
    fn on_focus_changed(&mut self, _cx: &mut EventCx<'_>, _focused: bool) {}

    /// The pointer entered (`true`) or left (`false`) this node.
    fn on_hover_changed(&mut self, _cx: &mut EventCx<'_>, _hovered: bool) {}

    /// The node was hidden (`true`) or shown (`false`).
    fn on_visibility_changed(&mut self, _cx: &mut EventCx<'_>, _hidden: bool) {}
}

/// A plain node with every hook left at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Block;

impl Widget for Block {}

/// Access handed to input and notification hooks.
///
/// The context borrows the whole tree except the widget being called, so a
/// hook may restructure the tree, move focus or request shutdown. Hooks
/// fired as a result (visibility, focus, hover) are delivered after the
/// current hook returns.
pub struct EventCx<'a> {
    tree: &'a mut SceneTree,
    ui: &'a mut UiContext,
    node: NodeId,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(tree: &'a mut SceneTree, ui: &'a mut UiContext, node: NodeId) -> Self {
        Self { tree, ui, node }
    }

    /// The node whose hook is running.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The scene tree.
    #[must_use]
    pub fn tree(&self) -> &SceneTree {
        &*self.tree
    }

    /// The scene tree, mutably.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut *self.tree
    }

    /// This node's rectangle in surface space.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`](crate::SceneError::StaleNode) if the
    /// hook destroyed its own node.
    pub fn bounds(&self) -> SceneResult<Rect> {
        self.tree.absolute_rect(self.node)
    }

    /// The focused node, if any.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.ui.focus().get()
    }

    /// The hovered node, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<NodeId> {
        self.ui.hover().get()
    }

    /// True if this node holds focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused() == Some(self.node)
    }

    /// True if this node is under the pointer.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered() == Some(self.node)
    }

    /// Gives keyboard focus to this node.
    pub fn request_focus(&mut self) {
        let node = self.node;
        // No-op once the hook has destroyed its own node.
        if self.tree.contains(node) {
            let _ = self.ui.set_focus(self.tree, Some(node));
        }
    }

    /// Moves focus to `node`, or clears it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`](crate::SceneError::StaleNode) for a
    /// destroyed node.
    pub fn set_focus(&mut self, node: Option<NodeId>) -> SceneResult<()> {
        self.ui.set_focus(self.tree, node)
    }

    /// Asks the application to close at the end of the current frame.
    pub fn request_close(&mut self) {
        self.ui.request_close();
    }

    /// Destroys `node` and its subtree, clearing focus and hover if they
    /// pointed into it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::StaleNode`](crate::SceneError::StaleNode) for a
    /// destroyed node.
    pub fn destroy(&mut self, node: NodeId) -> SceneResult<()> {
        let removed = self.tree.destroy(node)?;
        self.ui.forget(&removed);
        Ok(())
    }
}

/// Access handed to [`Widget::on_draw`].
pub struct DrawCx<'a> {
    surface: &'a mut dyn Surface,
    node: NodeId,
    bounds: Rect,
    focused: bool,
    hovered: bool,
}

impl<'a> DrawCx<'a> {
    pub(crate) fn new(
        surface: &'a mut dyn Surface,
        node: NodeId,
        bounds: Rect,
        focused: bool,
        hovered: bool,
    ) -> Self {
        Self {
            surface,
            node,
            bounds,
            focused,
            hovered,
        }
    }

    /// The node being drawn.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The node's rectangle in surface space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The visible part of the node, after clipping by its ancestors.
    #[must_use]
    pub fn clip(&self) -> Option<Rect> {
        self.surface.current_clip()
    }

    /// True if the node holds focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// True if the node is under the pointer.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// The surface to paint on.
    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }
}
