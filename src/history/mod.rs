//! Undo/redo history built on editor mementos.
//!
//! A memento is a deep copy of the annotation list plus, for destructive
//! operations, the source bitmap. Bitmap-carrying ("heavy") mementos are
//! bounded separately from the total count so a long crop session cannot
//! hold an unbounded number of full-size images.

mod manager;
mod memento;

pub use manager::{HistoryLimits, HistoryManager};
pub use memento::{EditorMemento, Originator};
