//! Input handling: event types, commands, and the input processor that
//! converts raw window events into engine commands.

/// Engine commands produced from input.
pub mod command;
/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into engine commands.
pub mod processor;

pub use command::Command;
pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, KeyBindings, KeyCommandTag};
