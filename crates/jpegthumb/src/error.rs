//! Error types for thumbnailing operations.
//!
//! Every fallible operation on an [`ImageHandle`](crate::ImageHandle)
//! reports one of these kinds; nothing panics and nothing is logged in place
//! of an error.

use thiserror::Error;

/// Thumbnailing error.
#[derive(Debug, Error)]
pub enum ThumbError {
    /// Source could not be read, header is malformed, or a dimension is <= 1.
    #[error("open failed: {0}")]
    OpenFailed(String),

    /// Codec reported a fatal error while decoding.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Destination could not be written or the codec rejected the encode.
    #[error("encode failed: {0}")]
    EncodeFailed(String),

    /// Requested pixel rectangle does not intersect the image.
    #[error("rectangle {w}x{h} at ({x},{y}) lies outside the {width}x{height} image")]
    ExtractOutOfRange {
        /// Requested left edge.
        x: i32,
        /// Requested top edge.
        y: i32,
        /// Requested width.
        w: u32,
        /// Requested height.
        h: u32,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The handle has already been encoded once.
    #[error("image has already been encoded")]
    AlreadyEncoded,

    /// Decode-time configuration was attempted after pixels were decoded.
    #[error("image has already been decoded")]
    AlreadyDecoded,

    /// Colorspace tag outside the supported set.
    #[error("invalid colorspace tag: {0}")]
    InvalidColorspace(u8),

    /// Colorspace name that matches no tag.
    #[error("unknown colorspace name: {0:?}")]
    UnknownColorspace(String),
}

/// Result type for thumbnailing operations.
pub type ThumbResult<T> = Result<T, ThumbError>;
