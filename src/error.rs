//! Error type for the few operations that can genuinely fail.
//!
//! Editing never fails: absent bitmaps, empty crops, and zero-size effects are
//! handled as no-ops. Only image decoding/encoding and cairo surface access
//! surface errors to the host.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface data unavailable: {0}")]
    SurfaceData(#[from] cairo::BorrowError),
}

pub type Result<T> = std::result::Result<T, MarkupError>;
