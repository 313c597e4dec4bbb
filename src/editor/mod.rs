//! Editing engine and tool state machine.
//!
//! This module turns host pointer events into annotation edits. It owns the
//! annotation list, the selection, the active tool, and the source bitmap,
//! and runs the pointer state machine (idle, drawing, dragging, resizing).

pub mod events;
pub mod state;
pub mod tool;

pub use events::{EditorEvent, MouseButton, PressOutcome};
pub use state::{Editor, EditorSettings, PointerState};
pub use tool::Tool;
