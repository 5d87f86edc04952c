//! Production image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::ImageReader` (format sniffed from content) |
//! | Color normalization | `DynamicImage::into_rgb8` (alpha dropped) |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → WebP | `webp::Encoder::encode_advanced` (libwebp, lossy, `method` = effort) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Effort, Quality, VariantParams};
use image::imageops::FilterType;
use image::{ImageReader, RgbImage};
use std::borrow::Cow;
use std::path::Path;

/// Backend built on the `image` and `webp` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, message: impl ToString) -> BackendError {
    BackendError::Decode {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Load, decode and normalize an image to RGB8.
fn load_rgb(path: &Path) -> Result<RgbImage, BackendError> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_error(path, e))?;
    Ok(img.into_rgb8())
}

/// Encode RGB8 pixels as lossy WebP.
fn encode_webp(img: &RgbImage, quality: Quality, effort: Effort) -> Result<Vec<u8>, BackendError> {
    let encoder = webp::Encoder::from_rgb(img.as_raw(), img.width(), img.height());

    let mut config = webp::WebPConfig::new()
        .map_err(|_| BackendError::Encode("failed to initialise WebPConfig".to_string()))?;
    config.quality = quality.value() as f32;
    config.method = effort.value() as i32;

    let data = encoder
        .encode_advanced(&config)
        .map_err(|e| BackendError::Encode(format!("{e:?}")))?;
    Ok(data.to_vec())
}

impl ImageBackend for RustBackend {
    type Image = RgbImage;

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<RgbImage, BackendError> {
        load_rgb(path)
    }

    fn dimensions(&self, image: &RgbImage) -> Dimensions {
        Dimensions {
            width: image.width(),
            height: image.height(),
        }
    }

    fn write_variant(&self, image: &RgbImage, params: &VariantParams) -> Result<(), BackendError> {
        let pixels: Cow<'_, RgbImage> =
            if image.width() == params.width && image.height() == params.height {
                Cow::Borrowed(image)
            } else {
                Cow::Owned(image::imageops::resize(
                    image,
                    params.width,
                    params.height,
                    FilterType::Lanczos3,
                ))
            };

        let encoded = encode_webp(&pixels, params.quality, params.effort)?;
        std::fs::write(&params.output, encoded)?;
        Ok(())
    }
}
