mod actions;
mod core;
mod mouse;
mod render;
#[cfg(test)]
mod tests;

pub use core::{Editor, EditorSettings, PointerState};
