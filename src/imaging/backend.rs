//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait splits the work into decode-once and
//! write-many: a source is decoded into the backend's own image handle, then
//! every variant is written from that handle. The handle is an owned value,
//! so dropping it (normally or on an early `?` return) releases the pixels.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::VariantParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("WebP encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decoded, color-normalized image owned by the caller.
    type Image;

    /// Read image dimensions from the file header, without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode a source file, discarding any alpha channel.
    fn decode(&self, path: &Path) -> Result<Self::Image, BackendError>;

    /// Native dimensions of a decoded image.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;

    /// Resize (if needed) and encode one variant to `params.output`.
    fn write_variant(&self, image: &Self::Image, params: &VariantParams)
    -> Result<(), BackendError>;
}
