//! Image processing: decode, resize, encode to WebP.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` → RGB8 |
//! | **Resize** | `image::imageops::resize`, Lanczos3 |
//! | **Encode** | `webp` (libwebp), lossy, method 6 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{VariantSize, calculate_variant_size, calculate_variant_sizes};
pub use operations::{GeneratedVariant, VariantConfig, create_variants, variant_file_name};
pub use params::{Effort, Quality, VariantParams};
pub use rust_backend::RustBackend;
