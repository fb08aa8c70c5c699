//! Recording widgets shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dispatch::default_pointer_press;
use crate::event::{KeyEvent, PointerEvent, TextEvent};
use crate::geometry::Rect;
use crate::node::{DrawCx, EventCx, NodeId, Widget};
use crate::style::Color;

#[derive(Debug, Default)]
struct Log {
    entries: Vec<String>,
    visible: Vec<String>,
}

/// Shared log of hook calls, in call order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Log>>);

impl Journal {
    fn push(&self, name: &str, what: &str) {
        self.0.borrow_mut().entries.push(format!("{name}:{what}"));
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().entries.clone()
    }

    /// Draw entries whose clip was not empty.
    pub(crate) fn visible_draws(&self) -> Vec<String> {
        self.0.borrow().visible.clone()
    }

    pub(crate) fn clear(&self) {
        let mut log = self.0.borrow_mut();
        log.entries.clear();
        log.visible.clear();
    }
}

/// Widget that records every hook into a [`Journal`].
pub(crate) struct Recorder {
    name: &'static str,
    journal: Journal,
    stop_keys: bool,
}

impl Recorder {
    pub(crate) fn boxed(name: &'static str, journal: &Journal) -> Box<dyn Widget> {
        Box::new(Self {
            name,
            journal: journal.clone(),
            stop_keys: false,
        })
    }

    /// A recorder that stops key events after recording them.
    pub(crate) fn stopping_keys(name: &'static str, journal: &Journal) -> Box<dyn Widget> {
        Box::new(Self {
            name,
            journal: journal.clone(),
            stop_keys: true,
        })
    }

    fn log(&self, what: &str) {
        self.journal.push(self.name, what);
    }
}

impl Widget for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_draw(&mut self, cx: &mut DrawCx<'_>) {
        self.log("draw");
        if cx.clip().is_some_and(|clip| !clip.is_empty()) {
            let entry = format!("{}:draw", self.name);
            self.journal.0.borrow_mut().visible.push(entry);
        }
        let bounds = cx.bounds();
        cx.surface().fill_rect(bounds, Color::WHITE);
    }

    fn on_pointer_press(&mut self, cx: &mut EventCx<'_>, event: &mut PointerEvent) {
        self.log("press");
        default_pointer_press(cx, event);
    }

    fn on_pointer_release(&mut self, _cx: &mut EventCx<'_>, _event: &mut PointerEvent) {
        self.log("release");
    }

    fn on_pointer_move(&mut self, _cx: &mut EventCx<'_>, _event: &mut PointerEvent) {
        self.log("move");
    }

    fn on_wheel(&mut self, _cx: &mut EventCx<'_>, _event: &mut PointerEvent) {
        self.log("wheel");
    }

    fn on_key_press(&mut self, _cx: &mut EventCx<'_>, event: &mut KeyEvent) {
        self.log("key");
        if self.stop_keys {
            event.stop_propagation();
        }
    }

    fn on_text_input(&mut self, _cx: &mut EventCx<'_>, _event: &mut TextEvent) {
        self.log("text");
    }

    fn on_focus_changed(&mut self, _cx: &mut EventCx<'_>, focused: bool) {
        self.log(if focused { "focus-entered" } else { "focus-left" });
    }

    fn on_hover_changed(&mut self, _cx: &mut EventCx<'_>, hovered: bool) {
        self.log(if hovered { "hover-entered" } else { "hover-left" });
    }

    fn on_visibility_changed(&mut self, _cx: &mut EventCx<'_>, hidden: bool) {
        self.log(if hidden { "hidden" } else { "shown" });
    }
}

/// What a [`Wrecker`] destroys when pressed.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Demolish {
    Node(NodeId),
    Itself,
}

/// Widget that destroys a node from its press hook, then asks for focus.
///
/// With `respawn` set, a fresh [`Recorder`] is inserted under the destroyed
/// node's parent, reusing the freed slot. `alive` is held for as long as
/// the widget exists.
pub(crate) struct Wrecker {
    name: &'static str,
    journal: Journal,
    target: Demolish,
    respawn: Option<&'static str>,
    _alive: Rc<()>,
}

impl Wrecker {
    pub(crate) fn boxed(
        name: &'static str,
        journal: &Journal,
        target: Demolish,
        respawn: Option<&'static str>,
        alive: &Rc<()>,
    ) -> Box<dyn Widget> {
        Box::new(Self {
            name,
            journal: journal.clone(),
            target,
            respawn,
            _alive: Rc::clone(alive),
        })
    }
}

impl Widget for Wrecker {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_pointer_press(&mut self, cx: &mut EventCx<'_>, _event: &mut PointerEvent) {
        self.journal.push(self.name, "press");
        let target = match self.target {
            Demolish::Node(node) => node,
            Demolish::Itself => cx.node(),
        };
        let parent = cx.tree().parent(target).ok().flatten();
        if cx.destroy(target).is_ok() {
            self.journal.push(self.name, "destroyed");
        }
        if let (Some(name), Some(parent)) = (self.respawn, parent) {
            let fresh = Recorder::boxed(name, &self.journal);
            if cx.tree_mut().insert(Rect::new(0.0, 0.0, 10.0, 10.0), Some(parent), 0, fresh).is_ok() {
                self.journal.push(self.name, "respawned");
            }
        }
        cx.request_focus();
    }
}
