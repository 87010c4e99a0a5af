//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor position,
//! held buttons and keys) and the key-binding map. It is the only thing
//! that sits between raw window events and
//! [`Engine::execute`](crate::Engine::execute).

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::event::{InputEvent, MouseButton};
use crate::camera::Movement;

/// Maps physical key strings to [`Command`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyR"`, `"Escape"`, etc.
///
/// Only discrete commands make sense as key bindings. Movement keys
/// (`W`/`A`/`S`/`D`) are read from held-key state instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`Command`] that can be key-bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Hide the pick highlight.
    ClearPick,
    /// Return the camera to its start pose.
    ResetCamera,
}

impl KeyCommandTag {
    fn to_command(self) -> Command {
        match self {
            Self::ClearPick => Command::ClearPick,
            Self::ResetCamera => Command::ResetCamera,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("Escape".into(), KeyCommandTag::ClearPick),
            ("KeyR".into(), KeyCommandTag::ResetCamera),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Command> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

/// Converts raw window events into [`Command`]s.
///
/// Left-drag rotates the camera, a right-button press picks at the
/// cursor, and bound keys fire on their first press.
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    cursor: Option<Vec2>,
    mouse_pressed: bool,
    held_keys: HashSet<String>,
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Last known cursor position in physical pixels.
    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Whether the key is currently held.
    #[must_use]
    pub fn is_held(&self, code: &str) -> bool {
        self.held_keys.contains(code)
    }

    /// Walk/strafe intent from the held `W`/`A`/`S`/`D` keys.
    #[must_use]
    pub fn movement(&self) -> Movement {
        let axis = |pos: &str, neg: &str| {
            f32::from(u8::from(self.is_held(pos))) - f32::from(u8::from(self.is_held(neg)))
        };
        Movement {
            forward: axis("KeyW", "KeyS"),
            right: axis("KeyD", "KeyA"),
        }
    }

    /// Forget held buttons and keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.mouse_pressed = false;
        self.held_keys.clear();
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(Vec2::new(x, y)),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Key { code, pressed } => self.handle_key(code, pressed),
        }
    }

    fn handle_cursor_moved(&mut self, position: Vec2) -> Option<Command> {
        let previous = self.cursor.replace(position)?;
        let delta = position - previous;
        (self.mouse_pressed && delta != Vec2::ZERO)
            .then_some(Command::RotateCamera { delta })
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) -> Option<Command> {
        match button {
            MouseButton::Left => {
                self.mouse_pressed = pressed;
                None
            }
            MouseButton::Right if pressed => {
                let cursor = self.cursor?;
                Some(Command::Pick {
                    x: cursor.x,
                    y: cursor.y,
                })
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, code: String, pressed: bool) -> Option<Command> {
        if !pressed {
            let _ = self.held_keys.remove(&code);
            return None;
        }
        let command = self.key_bindings.lookup(&code);
        // Auto-repeat presses arrive while the key is already held.
        self.held_keys.insert(code).then_some(command).flatten()
    }
}
