//! Input events as the navigation stack sees them
//!
//! The platform layer translates DOM (or scripted) input into
//! [`InputEvent`]s in canvas pixels, y down.

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Shift,
    Alt,
    Pause,
    Retry,
    /// Give up on the bird in flight and load the next one
    NextBird,
}

impl Key {
    /// Map a `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "ArrowLeft" | "KeyA" => Key::Left,
            "ArrowRight" | "KeyD" => Key::Right,
            "ShiftLeft" | "ShiftRight" => Key::Shift,
            "AltLeft" | "AltRight" => Key::Alt,
            "KeyP" | "Escape" => Key::Pause,
            "KeyR" => Key::Retry,
            "Space" => Key::NextBird,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerUp(Vec2),
    KeyDown(Key),
    KeyUp(Key),
}

/// Returned by every event handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    /// Lower layers don't see this event
    Stop,
}

/// Which modifier/arrow keys are held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyState {
    pub fn apply(&mut self, event: &InputEvent) {
        let (key, down) = match *event {
            InputEvent::KeyDown(key) => (key, true),
            InputEvent::KeyUp(key) => (key, false),
            _ => return,
        };
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Shift => self.shift = down,
            Key::Alt => self.alt = down,
            Key::Pause | Key::Retry | Key::NextBird => {}
        }
    }

    /// Manual pan for one frame. Shift pans faster, Alt nudges.
    pub fn pan(&self, speed: f32) -> f32 {
        let dir = match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => return 0.0,
        };
        let speed = if self.shift {
            speed * 3.0
        } else if self.alt {
            speed / 4.0
        } else {
            speed
        };
        dir * speed
    }
}
