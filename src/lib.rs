//! Embeddable screenshot annotation engine.
//!
//! A [`Session`] owns one source image, the annotations drawn over it, and a
//! bounded undo history. Hosts feed it pointer events and toolbar actions,
//! repaint from [`Session::render`] when asked, and export a flattened PNG
//! with [`Session::get_snapshot`]. Rendering goes through cairo and pango.

pub mod config;
pub mod draw;
pub mod editor;
pub mod error;
pub mod history;
pub mod session;
pub mod util;

pub use config::Config;
pub use error::MarkupError;
pub use session::Session;
