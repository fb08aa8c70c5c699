//! # Event Dispatch
//!
//! Pointer events travel top-down: each node hit-tests its children
//! (highest z first, later sibling wins a tie) and recurses into the first
//! one containing the point before running its own handler. The deepest
//! node reached becomes the hover target.
//!
//! Keyboard and text events travel bottom-up from the focused node to the
//! root. Both directions stop as soon as a handler stops propagation.

use crate::error::SceneResult;
use crate::event::{InputEvent, KeyEvent, KeyKind, PointerEvent, PointerKind, TextEvent};
use crate::geometry::Point;
use crate::node::{EventCx, NodeId, Widget};
use crate::scene::Scene;

/// Default press behavior: focus the node and stop propagation.
///
/// Widgets overriding [`Widget::on_pointer_press`] call this when they want
/// to keep the click-to-focus behavior.
pub fn default_pointer_press(cx: &mut EventCx<'_>, event: &mut PointerEvent) {
    cx.request_focus();
    event.stop_propagation();
}

impl Scene {
    /// Routes one input event through the scene.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoRoot`](crate::SceneError::NoRoot) for a
    /// pointer event when the scene has no root.
    pub fn dispatch(&mut self, event: &mut InputEvent) -> SceneResult<()> {
        match event {
            InputEvent::Pointer(pointer) => self.dispatch_pointer(pointer),
            InputEvent::Key(key) => {
                self.dispatch_key(key);
                Ok(())
            }
            InputEvent::Text(text) => {
                self.dispatch_text(text);
                Ok(())
            }
        }
    }

    /// Hit-tests and delivers a pointer event.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoRoot`](crate::SceneError::NoRoot) when the
    /// scene has no root.
    pub fn dispatch_pointer(&mut self, event: &mut PointerEvent) -> SceneResult<()> {
        let root = self.require_root()?;
        self.visit_pointer(root, event)?;
        self.flush_notifications();
        Ok(())
    }

    fn visit_pointer(&mut self, node: NodeId, event: &mut PointerEvent) -> SceneResult<()> {
        match self.hit_child(node, event.position())? {
            Some(child) => self.visit_pointer(child, event)?,
            None => {
                self.ui.set_hover(&mut self.tree, Some(node))?;
                self.flush_notifications();
            }
        }

        // A handler further down may have destroyed this node.
        if event.is_propagation_stopped() || !self.tree.contains(node) {
            return Ok(());
        }
        if self.tree.is_hidden(node)? {
            return Ok(());
        }

        self.with_widget(node, |widget, cx| {
            tracing::trace!(%node, name = widget.name(), kind = ?event.kind(), "pointer hook");
            match event.kind() {
                PointerKind::Press => widget.on_pointer_press(cx, event),
                PointerKind::Release => widget.on_pointer_release(cx, event),
                PointerKind::Move => widget.on_pointer_move(cx, event),
                PointerKind::Wheel => widget.on_wheel(cx, event),
            }
        });
        self.flush_notifications();
        Ok(())
    }

    /// The topmost child of `node` containing `point`, resorting first.
    fn hit_child(&mut self, node: NodeId, point: Point) -> SceneResult<Option<NodeId>> {
        self.tree.resort(node)?;
        let origin = self.tree.absolute_position(node)?;
        let children = self.tree.children(node)?;
        for &child in children.iter().rev() {
            let rect = self.tree.rect(child)?.translate(origin);
            if rect.contains(point) {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// The node a pointer event at `point` would hover: the deepest node
    /// reached by hit-testing from the root.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoRoot`](crate::SceneError::NoRoot) when the
    /// scene has no root.
    pub fn node_at(&mut self, point: Point) -> SceneResult<NodeId> {
        let mut node = self.require_root()?;
        while let Some(child) = self.hit_child(node, point)? {
            node = child;
        }
        Ok(node)
    }

    /// Bubbles a key event from the focused node to the root. Dropped when
    /// nothing has focus.
    pub fn dispatch_key(&mut self, event: &mut KeyEvent) {
        self.bubble(|widget, cx| {
            match event.kind() {
                KeyKind::Press => widget.on_key_press(cx, event),
                KeyKind::Release => widget.on_key_release(cx, event),
            }
            event.is_propagation_stopped()
        });
    }

    /// Bubbles a text event from the focused node to the root. Dropped when
    /// nothing has focus.
    pub fn dispatch_text(&mut self, event: &mut TextEvent) {
        self.bubble(|widget, cx| {
            widget.on_text_input(cx, event);
            event.is_propagation_stopped()
        });
    }

    /// Calls `hook` on the focused node and each ancestor until it reports
    /// that propagation stopped.
    fn bubble(&mut self, mut hook: impl FnMut(&mut dyn Widget, &mut EventCx<'_>) -> bool) {
        let Some(mut current) = self.focus() else {
            tracing::debug!("keyboard event dropped: nothing focused");
            return;
        };

        loop {
            let stopped = self.with_widget(current, |widget, cx| {
                tracing::trace!(node = %current, name = widget.name(), "keyboard hook");
                hook(widget, cx)
            });
            self.flush_notifications();
            if stopped.unwrap_or(false) {
                return;
            }
            match self.tree.parent(current) {
                Ok(Some(parent)) => current = parent,
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, MouseButton};
    use crate::geometry::Rect;
    use crate::node::Block;
    use crate::testing::{Demolish, Journal, Recorder, Wrecker};
    use std::rc::Rc;

    fn scene_with_root(journal: &Journal) -> (Scene, NodeId) {
        let scene = Scene::with_root(
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Recorder::boxed("root", journal),
        )
        .unwrap();
        let root = scene.root().unwrap();
        (scene, root)
    }

    #[test]
    fn test_overlapping_siblings_higher_z_wins() {
        let journal = Journal::default();
        let (mut scene, root) = scene_with_root(&journal);
        let a = scene
            .insert(Rect::new(0.0, 0.0, 100.0, 100.0), Some(root), 1, Recorder::boxed("a", &journal))
            .unwrap();
        let b = scene
            .insert(Rect::new(50.0, 50.0, 100.0, 100.0), Some(root), 2, Recorder::boxed("b", &journal))
            .unwrap();

        assert_eq!(scene.node_at(Point::new(75.0, 75.0)).unwrap(), b);
        assert_eq!(scene.node_at(Point::new(25.0, 25.0)).unwrap(), a);

        scene
            .dispatch_pointer(&mut PointerEvent::moved(Point::new(75.0, 75.0)))
            .unwrap();
        assert_eq!(scene.hovered(), Some(b));
        assert_eq!(journal.entries(), vec!["b:hover-entered", "b:move", "root:move"]);
    }

    #[test]
    fn test_equal_z_tie_goes_to_later_sibling() {
        let mut scene = Scene::with_root(Rect::new(0.0, 0.0, 50.0, 50.0), Box::new(Block)).unwrap();
        let root = scene.root();
        let _first = scene.insert_block(Rect::new(0.0, 0.0, 50.0, 50.0), root, 0).unwrap();
        let second = scene.insert_block(Rect::new(0.0, 0.0, 50.0, 50.0), root, 0).unwrap();

        assert_eq!(scene.node_at(Point::new(10.0, 10.0)).unwrap(), second);
    }

    #[test]
    fn test_leaf_handles_before_ancestors() {
        let journal = Journal::default();
        let (mut scene, root) = scene_with_root(&journal);
        let panel = scene
            .insert(Rect::new(10.0, 10.0, 100.0, 100.0), Some(root), 0, Recorder::boxed("panel", &journal))
            .unwrap();
        let leaf = scene
            .insert(Rect::new(10.0, 10.0, 20.0, 20.0), Some(panel), 0, Recorder::boxed("leaf", &journal))
            .unwrap();

        // The leaf's rect is relative to the panel: (20, 20)..(40, 40) on screen.
        assert_eq!(scene.node_at(Point::new(25.0, 25.0)).unwrap(), leaf);
        assert_eq!(scene.node_at(Point::new(15.0, 15.0)).unwrap(), panel);

        scene
            .dispatch_pointer(&mut PointerEvent::release(Point::new(25.0, 25.0), MouseButton::Left))
            .unwrap();
        let entries = journal.entries();
        assert_eq!(
            &entries[1..],
            &["leaf:release", "panel:release", "root:release"]
        );
    }

    #[test]
    fn test_press_focuses_and_stops_propagation() {
        let journal = Journal::default();
        let (mut scene, root) = scene_with_root(&journal);
        let button = scene
            .insert(Rect::new(0.0, 0.0, 40.0, 20.0), Some(root), 0, Recorder::boxed("button", &journal))
            .unwrap();

        let mut press = PointerEvent::press(Point::new(5.0, 5.0), MouseButton::Left);
        scene.dispatch_pointer(&mut press).unwrap();

        assert!(press.is_propagation_stopped());
        assert_eq!(scene.focus(), Some(button));
        assert_eq!(
            journal.entries(),
            vec!["button:hover-entered", "button:press", "button:focus-entered"]
        );
    }

    #[test]
    fn test_hidden_node_is_hit_but_not_handled() {
        let journal = Journal::default();
        let (mut scene, root) = scene_with_root(&journal);
        let ghost = scene
            .insert(Rect::new(0.0, 0.0, 40.0, 40.0), Some(root), 0, Recorder::boxed("ghost", &journal))
            .unwrap();
        scene.hide(ghost).unwrap();
        journal.clear();

        scene
            .dispatch_pointer(&mut PointerEvent::moved(Point::new(5.0, 5.0)))
            .unwrap();
        assert_eq!(scene.hovered(), Some(ghost));
        assert_eq!(journal.entries(), vec!["ghost:hover-entered", "root:move"]);
    }

    #[test]
    fn test_key_bubbles_until_stopped() {
        let journal = Journal::default();
        let (mut scene, root) = scene_with_root(&journal);
        let form = scene
            .insert(Rect::ZERO, Some(root), 0, Recorder::stopping_keys("form", &journal))
            .unwrap();
        let field = scene
            .insert(Rect::ZERO, Some(form), 0, Recorder::boxed("field", &journal))
            .unwrap();
        scene.set_focus(Some(field)).unwrap();
        journal.clear();

        let mut key = KeyEvent::press(Key::Enter);
        scene.dispatch_key(&mut key);

        assert!(key.is_propagation_stopped());
        assert_eq!(journal.entries(), vec!["field:key", "form:key"]);
    }

    #[test]
    fn test_text_reaches_root_when_unhandled() {
        let journal = Journal::default();
        let (mut scene, root) = scene_with_root(&journal);
        let field = scene
            .insert(Rect::ZERO, Some(root), 0, Recorder::boxed("field", &journal))
            .unwrap();
        scene.set_focus(Some(field)).unwrap();
        journal.clear();

        scene.dispatch(&mut InputEvent::Text(TextEvent::new("a"))).unwrap();
        assert_eq!(journal.entries(), vec!["field:text", "root:text"]);
    }

    #[test]
    fn test_key_without_focus_is_dropped() {
        let journal = Journal::default();
        let (mut scene, _root) = scene_with_root(&journal);

        scene
            .dispatch(&mut InputEvent::Key(KeyEvent::press(Key::Escape)))
            .unwrap();
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_pointer_without_root_is_an_error() {
        let mut scene = Scene::new();
        let result = scene.dispatch_pointer(&mut PointerEvent::moved(Point::ZERO));
        assert_eq!(result, Err(crate::SceneError::NoRoot));
    }

    #[test]
    fn test_press_that_destroys_an_ancestor_skips_it() {
        let journal = Journal::default();
        let alive = Rc::new(());
        let (mut scene, root) = scene_with_root(&journal);
        let parent = scene
            .insert(Rect::new(0.0, 0.0, 100.0, 100.0), Some(root), 0, Recorder::boxed("parent", &journal))
            .unwrap();
        let leaf = scene
            .insert(
                Rect::new(10.0, 10.0, 20.0, 20.0),
                Some(parent),
                0,
                Wrecker::boxed("leaf", &journal, Demolish::Node(parent), None, &alive),
            )
            .unwrap();
        assert_eq!(scene.tree().len(), 3);

        scene
            .dispatch_pointer(&mut PointerEvent::press(Point::new(15.0, 15.0), MouseButton::Left))
            .unwrap();

        assert_eq!(
            journal.entries(),
            vec!["leaf:press", "leaf:destroyed", "root:press", "root:focus-entered"]
        );
        assert_eq!(scene.tree().len(), 1);
        assert!(!scene.tree().contains(leaf));
        assert_eq!(scene.hovered(), None);
        assert_eq!(scene.focus(), Some(root));
        assert_eq!(Rc::strong_count(&alive), 1);
    }

    #[test]
    fn test_hook_destroying_its_own_node_drops_the_widget() {
        let journal = Journal::default();
        let alive = Rc::new(());
        let mut scene = Scene::with_root(Rect::new(0.0, 0.0, 200.0, 200.0), Box::new(Block)).unwrap();
        let root = scene.root().unwrap();
        let victim = scene
            .insert(
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Some(root),
                0,
                Wrecker::boxed("victim", &journal, Demolish::Itself, Some("fresh"), &alive),
            )
            .unwrap();

        scene
            .dispatch_pointer(&mut PointerEvent::press(Point::new(10.0, 10.0), MouseButton::Left))
            .unwrap();

        assert_eq!(
            journal.entries(),
            vec!["victim:press", "victim:destroyed", "victim:respawned"]
        );
        assert_eq!(Rc::strong_count(&alive), 1);
        assert!(!scene.tree().contains(victim));
        assert_eq!(scene.hovered(), None);

        let fresh = scene.tree().children(root).unwrap()[0];
        assert_eq!(fresh.index(), victim.index());
        assert_eq!(fresh.generation(), victim.generation() + 1);

        journal.clear();
        scene
            .dispatch_pointer(&mut PointerEvent::press(Point::new(5.0, 5.0), MouseButton::Left))
            .unwrap();
        assert_eq!(
            journal.entries(),
            vec!["fresh:hover-entered", "fresh:press", "fresh:focus-entered"]
        );
        assert_eq!(scene.focus(), Some(fresh));
    }
}
