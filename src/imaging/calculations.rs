//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// A single variant to generate for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSize {
    /// Configured target width (used in the output file name).
    pub target_width: u32,
    /// Calculated output width.
    pub width: u32,
    /// Calculated output height.
    pub height: u32,
}

impl VariantSize {
    /// True when the variant is the source at native resolution.
    pub fn is_native(&self, native: Dimensions) -> bool {
        self.width == native.width && self.height == native.height
    }
}

/// Calculate the output size for one target width.
///
/// Never upscales: a source no wider than the target keeps its native size.
/// Otherwise the width becomes the target and the height follows the aspect
/// ratio, rounded to the nearest pixel (at least 1).
///
/// # Examples
/// ```
/// # use webp_sizes::imaging::{Dimensions, calculate_variant_size};
/// let native = Dimensions { width: 3000, height: 2000 };
/// let v = calculate_variant_size(native, 480);
/// assert_eq!((v.width, v.height), (480, 320));
///
/// // 800px source, 960px target → native size, no upscale
/// let small = Dimensions { width: 800, height: 600 };
/// let v = calculate_variant_size(small, 960);
/// assert_eq!((v.target_width, v.width, v.height), (960, 800, 600));
/// ```
pub fn calculate_variant_size(native: Dimensions, target_width: u32) -> VariantSize {
    if native.width <= target_width {
        return VariantSize {
            target_width,
            width: native.width,
            height: native.height,
        };
    }

    let height = (native.height as f64 * target_width as f64 / native.width as f64).round() as u32;
    VariantSize {
        target_width,
        width: target_width,
        height: height.max(1),
    }
}

/// Calculate one variant per configured width, in configured order.
///
/// Unlike a breakpoint filter, widths at or above the native width are kept:
/// every width yields exactly one variant, capped at native resolution.
pub fn calculate_variant_sizes(native: Dimensions, widths: &[u32]) -> Vec<VariantSize> {
    widths
        .iter()
        .map(|&width| calculate_variant_size(native, width))
        .collect()
}
