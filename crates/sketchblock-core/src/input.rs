//! Pointer and keyboard event types fed into the interaction engine.

use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// Empty stage area.
    Stage,
    /// An existing shape (or its hit target).
    Shape(ShapeId),
}

/// Pointer event in stage coordinates.
///
/// `position` is `None` when the stage could not report a pointer position
/// (e.g. not mounted yet); such events are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Option<Point>,
        target: PointerTarget,
    },
    Move {
        position: Option<Point>,
    },
    Up,
}

/// A key press, named like DOM `KeyboardEvent.key` ("Escape", "Enter", "z").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }

    pub fn is_enter(&self) -> bool {
        self.key == "Enter"
    }

    /// Ctrl+Z / Cmd+Z (case-insensitive on the key).
    pub fn is_undo(&self) -> bool {
        self.modifiers.command() && self.key.eq_ignore_ascii_case("z")
    }
}

/// Whether a handler acted on a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled; the event must not reach other shortcuts.
    Consumed,
    /// Not handled.
    Ignored,
}

impl KeyOutcome {
    pub fn is_consumed(&self) -> bool {
        matches!(self, KeyOutcome::Consumed)
    }
}
