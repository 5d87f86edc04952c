//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. They are the interface
//! between [`operations`](super::operations) (which decides which variants to
//! produce) and the [`backend`](super::backend) (which does the pixel work),
//! so a mock backend can stand in for tests.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy WebP quality (0–100). Clamped on construction.
//! - [`Effort`]: libwebp compression method (0–6). Variants always use [`Effort::MAX`].
//! - [`VariantParams`]: Full specification for one variant: output path, dimensions, quality, effort.

use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// libwebp compression method: 0 is fastest, 6 is slowest with the smallest output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effort(u8);

impl Effort {
    pub const MAX: Effort = Effort(6);

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Parameters for writing one variant of an already-decoded source.
///
/// When `width`/`height` equal the native dimensions the backend encodes the
/// decoded pixels as-is, without resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantParams {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    pub effort: Effort,
}
