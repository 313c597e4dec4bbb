//! Rendering primitives and the annotation model (Cairo-based).
//!
//! This module defines the core drawing types used for image markup:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Annotation`]: one markup object and its variant data
//! - [`Bitmap`]: owned RGBA pixel buffers used for sources, images, and effect caches
//! - Rendering functions for Cairo-based output

pub mod annotation;
pub mod bitmap;
pub mod color;
pub mod dirty;
pub mod effect;
pub mod font;
pub mod geometry;
pub mod handle;
pub mod render;

// Re-export commonly used types at module level
pub use annotation::{Annotation, AnnotationDefaults, AnnotationId, AnnotationKind, Style};
pub use bitmap::Bitmap;
pub use color::Color;
pub use dirty::DirtyTracker;
pub use effect::{EffectKind, EffectRegion};
pub use font::FontDescriptor;
pub use geometry::{Bounds, Point};
pub use handle::Handle;
pub use render::{render_annotation, render_annotations, render_selection, render_source};

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
