//! Error types for the pixel translation library.

use std::io;
use thiserror::Error;

/// Result type for pixel format operations.
pub type Result<T> = std::result::Result<T, PixelError>;

/// Errors that can occur when parsing or translating pixel formats.
#[derive(Debug, Error)]
pub enum PixelError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Buffer too short to hold a complete wire-format PIXEL_FORMAT.
    #[error("Truncated pixel format: need {expected} bytes, got {actual}")]
    TruncatedPixelFormat {
        /// Number of bytes a complete PIXEL_FORMAT occupies.
        expected: usize,
        /// Number of bytes actually available.
        actual: usize,
    },

    /// Pixel format the library cannot produce output for.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),
}
