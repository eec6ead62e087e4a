//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when working with DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] perun_common::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// Pixel format not supported by this codec.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// Texture layout (dimension, extents, counts) not supported.
    #[error("unsupported texture layout: {0}")]
    UnsupportedLayout(String),

    /// Image data ends before the last subresource.
    #[error("truncated image data: needed {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// The decoder's subresource layout disagrees with the container's.
    ///
    /// This guards against drift between the format metadata table and
    /// the pitch formulas; it indicates a codec bug, not bad input.
    #[error("subresource layout mismatch at index {index}")]
    LayoutMismatch { index: usize },
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
