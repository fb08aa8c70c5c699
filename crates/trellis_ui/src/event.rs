//! Input event types delivered to nodes.
//!
//! Events are immutable once built, except for the propagation flag: any
//! handler may call `stop_propagation()`, after which no further node sees
//! the event. Pointer positions are absolute (surface space).

use crate::geometry::Point;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Keyboard key.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

/// Which pointer action an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A button went down.
    Press,
    /// A button went up.
    Release,
    /// The pointer moved.
    Move,
    /// The wheel scrolled.
    Wheel,
}

/// A pointer event, hit-tested top-down through the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    kind: PointerKind,
    position: Point,
    button: Option<MouseButton>,
    wheel_delta: Point,
    modifiers: Modifiers,
    click_count: u8,
    stopped: bool,
}

impl PointerEvent {
    fn new(kind: PointerKind, position: Point) -> Self {
        Self {
            kind,
            position,
            button: None,
            wheel_delta: Point::ZERO,
            modifiers: Modifiers::default(),
            click_count: 0,
            stopped: false,
        }
    }

    /// A button press at `position`.
    #[must_use]
    pub fn press(position: Point, button: MouseButton) -> Self {
        Self {
            button: Some(button),
            click_count: 1,
            ..Self::new(PointerKind::Press, position)
        }
    }

    /// A button release at `position`.
    #[must_use]
    pub fn release(position: Point, button: MouseButton) -> Self {
        Self {
            button: Some(button),
            ..Self::new(PointerKind::Release, position)
        }
    }

    /// A pointer move to `position`.
    #[must_use]
    pub fn moved(position: Point) -> Self {
        Self::new(PointerKind::Move, position)
    }

    /// A wheel scroll of `delta` with the pointer at `position`.
    #[must_use]
    pub fn wheel(position: Point, delta: Point) -> Self {
        Self {
            wheel_delta: delta,
            ..Self::new(PointerKind::Wheel, position)
        }
    }

    /// Attaches the modifier state.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The pointer action.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> PointerKind {
        self.kind
    }

    /// Absolute pointer position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Button involved in a press or release.
    #[inline]
    #[must_use]
    pub const fn button(&self) -> Option<MouseButton> {
        self.button
    }

    /// Scroll amount of a wheel event.
    #[inline]
    #[must_use]
    pub const fn wheel_delta(&self) -> Point {
        self.wheel_delta
    }

    /// Modifier keys held when the event was produced.
    #[inline]
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// 1 for a single click, 2 for a double click, and so on. Zero for
    /// anything but a press.
    #[inline]
    #[must_use]
    pub const fn click_count(&self) -> u8 {
        self.click_count
    }

    pub(crate) fn set_click_count(&mut self, count: u8) {
        self.click_count = count;
    }

    /// Stops delivery to any further node.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Returns true once a handler stopped the event.
    #[inline]
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Key went down (or auto-repeated).
    Press,
    /// Key went up.
    Release,
}

/// A key event, bubbled from the focused node to the root.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    kind: KeyKind,
    key: Key,
    modifiers: Modifiers,
    repeat: bool,
    stopped: bool,
}

impl KeyEvent {
    /// A key press.
    #[must_use]
    pub const fn press(key: Key) -> Self {
        Self {
            kind: KeyKind::Press,
            key,
            modifiers: Modifiers {
                shift: false,
                ctrl: false,
                alt: false,
                super_key: false,
            },
            repeat: false,
            stopped: false,
        }
    }

    /// A key release.
    #[must_use]
    pub const fn release(key: Key) -> Self {
        let mut event = Self::press(key);
        event.kind = KeyKind::Release;
        event
    }

    /// Attaches the modifier state.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Marks the press as an auto-repeat.
    #[must_use]
    pub const fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Press or release.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        self.kind
    }

    /// The key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }

    /// Modifier keys held when the event was produced.
    #[inline]
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// True for auto-repeated presses.
    #[inline]
    #[must_use]
    pub const fn is_repeat(&self) -> bool {
        self.repeat
    }

    /// Stops delivery to any further node.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Returns true once a handler stopped the event.
    #[inline]
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

/// Committed text input, bubbled like a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
    text: String,
    stopped: bool,
}

impl TextEvent {
    /// Creates a text event.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stopped: false,
        }
    }

    /// The committed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Stops delivery to any further node.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Returns true once a handler stopped the event.
    #[inline]
    #[must_use]
    pub const fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

/// Any input the scene can dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Press, release, move or wheel.
    Pointer(PointerEvent),
    /// Key press or release.
    Key(KeyEvent),
    /// Text input.
    Text(TextEvent),
}

impl InputEvent {
    /// True for pointer events, which are hit-tested rather than bubbled.
    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Returns true once a handler stopped the event.
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        match self {
            Self::Pointer(e) => e.is_propagation_stopped(),
            Self::Key(e) => e.is_propagation_stopped(),
            Self::Text(e) => e.is_propagation_stopped(),
        }
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}

impl From<TextEvent> for InputEvent {
    fn from(event: TextEvent) -> Self {
        Self::Text(event)
    }
}
