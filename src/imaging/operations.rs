//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{VariantSize, calculate_variant_sizes};
use super::params::{Effort, Quality, VariantParams};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Extension of every generated variant.
pub const VARIANT_EXTENSION: &str = "webp";

/// Configuration for variant generation.
#[derive(Debug, Clone)]
pub struct VariantConfig {
    pub widths: Vec<u32>,
    pub quality: Quality,
    pub effort: Effort,
}

/// A variant written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedVariant {
    pub target_width: u32,
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
}

/// `<stem>-<target_width>.webp`
pub fn variant_file_name(stem: &str, target_width: u32) -> String {
    format!("{}-{}.{}", stem, target_width, VARIANT_EXTENSION)
}

/// Plan every variant of one source without touching the backend.
pub fn plan_variants(
    output_dir: &Path,
    stem: &str,
    native: Dimensions,
    config: &VariantConfig,
) -> Vec<(VariantSize, VariantParams)> {
    calculate_variant_sizes(native, &config.widths)
        .into_iter()
        .map(|size| {
            let params = VariantParams {
                output: output_dir.join(variant_file_name(stem, size.target_width)),
                width: size.width,
                height: size.height,
                quality: config.quality,
                effort: config.effort,
            };
            (size, params)
        })
        .collect()
}

/// Decode `source` once and write one variant per configured width.
///
/// `on_written` is called after each file lands on disk. The decoded image
/// lives only for the duration of this call.
pub fn create_variants<B: ImageBackend>(
    backend: &B,
    source: &Path,
    output_dir: &Path,
    stem: &str,
    config: &VariantConfig,
    mut on_written: impl FnMut(&GeneratedVariant),
) -> Result<(Dimensions, Vec<GeneratedVariant>)> {
    let image = backend.decode(source)?;
    let native = backend.dimensions(&image);

    let mut variants = Vec::with_capacity(config.widths.len());
    for (size, params) in plan_variants(output_dir, stem, native, config) {
        backend.write_variant(&image, &params)?;

        let variant = GeneratedVariant {
            target_width: size.target_width,
            width: size.width,
            height: size.height,
            path: params.output,
        };
        on_written(&variant);
        variants.push(variant);
    }

    Ok((native, variants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    fn config(widths: &[u32]) -> VariantConfig {
        VariantConfig {
            widths: widths.to_vec(),
            quality: Quality::new(82),
            effort: Effort::MAX,
        }
    }

    #[test]
    fn variant_file_name_uses_target_width() {
        assert_eq!(variant_file_name("photo-sunset", 480), "photo-sunset-480.webp");
    }

    #[test]
    fn plan_variants_names_and_sizes() {
        let plan = plan_variants(
            Path::new("/out"),
            "photo-sunset",
            Dimensions {
                width: 3000,
                height: 2000,
            },
            &config(&[480, 960, 1440]),
        );

        let got: Vec<(PathBuf, u32, u32)> = plan
            .iter()
            .map(|(_, p)| (p.output.clone(), p.width, p.height))
            .collect();
        assert_eq!(
            got,
            vec![
                (PathBuf::from("/out/photo-sunset-480.webp"), 480, 320),
                (PathBuf::from("/out/photo-sunset-960.webp"), 960, 640),
                (PathBuf::from("/out/photo-sunset-1440.webp"), 1440, 960),
            ]
        );
    }

    #[test]
    fn create_variants_decodes_once_then_writes_each_width() {
        let backend = MockBackend::with_sources(&[("photo-a.jpg", 2000, 1500)]);

        let (native, variants) = create_variants(
            &backend,
            Path::new("/src/photo-a.jpg"),
            Path::new("/out"),
            "photo-a",
            &config(&[800, 1400]),
            |_| {},
        )
        .unwrap();

        assert_eq!(
            native,
            Dimensions {
                width: 2000,
                height: 1500
            }
        );
        assert_eq!(variants.len(), 2);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0], RecordedOp::Decode("photo-a.jpg".to_string()));
        assert!(matches!(
            &ops[1],
            RecordedOp::Write { width: 800, height: 600, quality: 82, effort: 6, .. }
        ));
        assert!(matches!(
            &ops[2],
            RecordedOp::Write { width: 1400, height: 1050, .. }
        ));
    }

    #[test]
    fn create_variants_keeps_native_size_for_wide_targets() {
        let backend = MockBackend::with_sources(&[("photo-small.jpg", 800, 600)]);

        let (_, variants) = create_variants(
            &backend,
            Path::new("/src/photo-small.jpg"),
            Path::new("/out"),
            "photo-small",
            &config(&[480, 960]),
            |_| {},
        )
        .unwrap();

        assert_eq!(variants[1].target_width, 960);
        assert_eq!((variants[1].width, variants[1].height), (800, 600));
        assert_eq!(variants[1].path, PathBuf::from("/out/photo-small-960.webp"));
    }

    #[test]
    fn create_variants_reports_each_write() {
        let backend = MockBackend::with_sources(&[("photo-a.jpg", 1000, 1000)]);
        let mut seen = Vec::new();

        create_variants(
            &backend,
            Path::new("/src/photo-a.jpg"),
            Path::new("/out"),
            "photo-a",
            &config(&[100, 200, 300]),
            |v| seen.push(v.target_width),
        )
        .unwrap();

        assert_eq!(seen, vec![100, 200, 300]);
    }

    #[test]
    fn create_variants_decode_failure_writes_nothing() {
        let backend =
            MockBackend::with_sources(&[("photo-a.jpg", 1000, 1000)]).with_corrupt("photo-a.jpg");

        let result = create_variants(
            &backend,
            Path::new("/src/photo-a.jpg"),
            Path::new("/out"),
            "photo-a",
            &config(&[100]),
            |_| {},
        );

        assert!(result.is_err());
        assert!(backend.written_outputs().is_empty());
    }
}
