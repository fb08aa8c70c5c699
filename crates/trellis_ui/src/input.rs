//! Input state tracking.
//!
//! `InputState` watches every event before dispatch: it remembers where the
//! pointer is, which buttons and keys are held, and numbers consecutive
//! presses so handlers can tell a double click from two single clicks.

use crate::event::{InputEvent, Key, KeyKind, Modifiers, MouseButton, PointerKind};
use crate::geometry::Point;

/// Thresholds for multi-click detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSettings {
    /// Maximum seconds between presses.
    pub time: f32,
    /// Maximum pointer travel in pixels between presses.
    pub distance: f32,
}

impl Default for ClickSettings {
    fn default() -> Self {
        Self {
            time: 0.3,
            distance: 5.0,
        }
    }
}

/// Input state accumulated across frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pointer: Point,
    /// Mouse buttons currently held.
    buttons_down: u8,
    /// Keys currently held.
    keys_down: Vec<Key>,
    modifiers: Modifiers,
    last_click_time: Option<f32>,
    last_click_pos: Point,
    last_click_button: Option<MouseButton>,
    click_count: u8,
    settings: ClickSettings,
}

impl InputState {
    /// Creates an input tracker with the given click thresholds.
    #[must_use]
    pub fn new(settings: ClickSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Records `event`, observed at `now` seconds, and annotates presses
    /// with their click count.
    pub fn observe(&mut self, event: &mut InputEvent, now: f32) {
        match event {
            InputEvent::Pointer(pointer) => {
                self.pointer = pointer.position();
                self.modifiers = pointer.modifiers();
                match (pointer.kind(), pointer.button()) {
                    (PointerKind::Press, Some(button)) => {
                        self.buttons_down |= Self::button_mask(button);
                        let count = self.count_click(button, pointer.position(), now);
                        pointer.set_click_count(count);
                    }
                    (PointerKind::Release, Some(button)) => {
                        self.buttons_down &= !Self::button_mask(button);
                    }
                    _ => {}
                }
            }
            InputEvent::Key(key) => {
                self.modifiers = key.modifiers();
                match key.kind() {
                    KeyKind::Press => {
                        if !self.keys_down.contains(&key.key()) {
                            self.keys_down.push(key.key());
                        }
                    }
                    KeyKind::Release => self.keys_down.retain(|&k| k != key.key()),
                }
            }
            InputEvent::Text(_) => {}
        }
    }

    fn count_click(&mut self, button: MouseButton, position: Point, now: f32) -> u8 {
        let chained = self.last_click_button == Some(button)
            && self
                .last_click_time
                .is_some_and(|last| now - last < self.settings.time)
            && position.distance(self.last_click_pos) < self.settings.distance;

        self.click_count = if chained {
            self.click_count.saturating_add(1)
        } else {
            1
        };
        self.last_click_time = Some(now);
        self.last_click_pos = position;
        self.last_click_button = Some(button);
        self.click_count
    }

    /// Last known pointer position.
    #[must_use]
    pub const fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// Returns true if the mouse button is currently held.
    #[must_use]
    pub const fn button_held(&self, button: MouseButton) -> bool {
        (self.buttons_down & Self::button_mask(button)) != 0
    }

    /// Returns true if the key is currently held.
    #[must_use]
    pub fn key_held(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Modifier state carried by the most recent event.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Returns the bit mask for a button.
    const fn button_mask(button: MouseButton) -> u8 {
        match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 4,
        }
    }
}
