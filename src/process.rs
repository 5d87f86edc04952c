//! Responsive variant generation: the batch pass.
//!
//! Takes the source directory, discovers `photo-*.jpg` files, and writes one
//! WebP per configured width for each of them.
//!
//! ## Output Structure
//!
//! ```text
//! images/optimized/
//! ├── photo-hall-480.webp
//! ├── photo-hall-960.webp
//! ├── photo-hall-1440.webp
//! ├── photo-sunset-480.webp
//! └── ...
//! ```
//!
//! ## Failures
//!
//! Each source is an independent unit whose result is a [`SourceOutcome`].
//! With [`FailurePolicy::Abort`] the first failing source ends the run with
//! an error. With [`FailurePolicy::Continue`] the failure is recorded in the
//! [`GenerationReport`] and the next source is processed. Either way, files
//! already written stay on disk.
//!
//! A missing source directory is always fatal and is detected before the
//! output directory is created.
//!
//! Processing is sequential: one source, one width at a time.

use crate::config::GeneratorConfig;
use crate::imaging::{
    BackendError, Dimensions, GeneratedVariant, ImageBackend, RustBackend, VariantParams,
    VariantSize, create_variants, operations::plan_variants,
};
use crate::sources::{SourceImage, discover_sources};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source directory not found: {0}")]
    SourceDirNotFound(PathBuf),
    #[error("Failed to process {path}: {error}")]
    Imaging {
        path: PathBuf,
        #[source]
        error: BackendError,
    },
    #[error("{} source(s) could not be processed", .0.len())]
    SourcesFailed(Vec<PathBuf>),
}

/// What to do when one source fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing source.
    #[default]
    Abort,
    /// Record the failure and carry on with the next source.
    Continue,
}

/// Progress notification emitted while generating.
#[derive(Debug)]
pub enum ProcessEvent {
    /// About to decode a source. `index` is 1-based.
    SourceStarted {
        index: usize,
        total: usize,
        source: PathBuf,
    },
    VariantWritten(GeneratedVariant),
    SourceFailed { source: PathBuf, error: String },
}

/// Result of processing one source.
#[derive(Debug)]
pub enum SourceOutcome {
    Generated {
        source: SourceImage,
        native: Dimensions,
        variants: Vec<GeneratedVariant>,
    },
    Failed {
        source: SourceImage,
        error: BackendError,
    },
}

impl SourceOutcome {
    pub fn source(&self) -> &SourceImage {
        match self {
            SourceOutcome::Generated { source, .. } | SourceOutcome::Failed { source, .. } => {
                source
            }
        }
    }
}

/// Per-source outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub outcomes: Vec<SourceOutcome>,
}

impl GenerationReport {
    pub fn source_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn variant_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                SourceOutcome::Generated { variants, .. } => variants.len(),
                SourceOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SourceOutcome::Failed { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// `Err` listing the failed sources if any were collected under
    /// [`FailurePolicy::Continue`].
    pub fn ensure_success(&self) -> Result<(), ProcessError> {
        if self.is_success() {
            return Ok(());
        }
        let failed = self.failed().map(|o| o.source().path.clone()).collect();
        Err(ProcessError::SourcesFailed(failed))
    }
}

/// Generate variants with the production backend.
pub fn generate(
    source_dir: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    policy: FailurePolicy,
    on_event: impl FnMut(&ProcessEvent),
) -> Result<GenerationReport, ProcessError> {
    let backend = RustBackend::new();
    generate_with_backend(&backend, source_dir, output_dir, config, policy, on_event)
}

/// Generate variants using a specific backend (allows testing with mock).
pub fn generate_with_backend<B: ImageBackend>(
    backend: &B,
    source_dir: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    policy: FailurePolicy,
    mut on_event: impl FnMut(&ProcessEvent),
) -> Result<GenerationReport, ProcessError> {
    let sources = list_sources(source_dir)?;
    std::fs::create_dir_all(output_dir)?;

    let variant_config = config.variant_config();
    let mut report = GenerationReport::default();
    let total = sources.len();

    for (index, source) in sources.into_iter().enumerate() {
        tracing::info!(
            source = %source.path.display(),
            index = index + 1,
            total,
            "processing source"
        );
        on_event(&ProcessEvent::SourceStarted {
            index: index + 1,
            total,
            source: source.path.clone(),
        });

        let result = create_variants(
            backend,
            &source.path,
            output_dir,
            &source.base_name,
            &variant_config,
            |variant| on_event(&ProcessEvent::VariantWritten(variant.clone())),
        );

        match result {
            Ok((native, variants)) => {
                tracing::debug!(
                    source = %source.path.display(),
                    width = native.width,
                    height = native.height,
                    variants = variants.len(),
                    "source done"
                );
                report.outcomes.push(SourceOutcome::Generated {
                    source,
                    native,
                    variants,
                });
            }
            Err(error) => match policy {
                FailurePolicy::Abort => {
                    return Err(ProcessError::Imaging {
                        path: source.path,
                        error,
                    });
                }
                FailurePolicy::Continue => {
                    tracing::warn!(source = %source.path.display(), %error, "skipping source");
                    on_event(&ProcessEvent::SourceFailed {
                        source: source.path.clone(),
                        error: error.to_string(),
                    });
                    report.outcomes.push(SourceOutcome::Failed { source, error });
                }
            },
        }
    }

    Ok(report)
}

/// Planned variants of one source, as `check` shows them.
#[derive(Debug)]
pub struct SourcePlan {
    pub source: SourceImage,
    pub plan: Result<(Dimensions, Vec<(VariantSize, VariantParams)>), BackendError>,
}

/// Work out what `generate` would write, reading only image headers.
///
/// Nothing is created on disk, not even the output directory.
pub fn plan_with_backend<B: ImageBackend>(
    backend: &B,
    source_dir: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
) -> Result<Vec<SourcePlan>, ProcessError> {
    let variant_config = config.variant_config();
    let plans = list_sources(source_dir)?
        .into_iter()
        .map(|source| {
            let plan = backend.identify(&source.path).map(|native| {
                let variants =
                    plan_variants(output_dir, &source.base_name, native, &variant_config);
                (native, variants)
            });
            SourcePlan { source, plan }
        })
        .collect();
    Ok(plans)
}

/// [`plan_with_backend`] with the production backend.
pub fn plan(
    source_dir: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
) -> Result<Vec<SourcePlan>, ProcessError> {
    plan_with_backend(&RustBackend::new(), source_dir, output_dir, config)
}

fn list_sources(source_dir: &Path) -> Result<Vec<SourceImage>, ProcessError> {
    if !source_dir.is_dir() {
        return Err(ProcessError::SourceDirNotFound(source_dir.to_path_buf()));
    }
    Ok(discover_sources(source_dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use std::fs;
    use tempfile::TempDir;

    fn create_dummy_sources(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            // Empty files - the mock backend doesn't read content
            fs::write(dir.join(name), "").unwrap();
        }
    }

    fn config(widths: &[u32], quality: u32) -> GeneratorConfig {
        GeneratorConfig {
            widths: widths.to_vec(),
            quality,
        }
    }

    fn run(
        backend: &MockBackend,
        tmp: &TempDir,
        config: &GeneratorConfig,
        policy: FailurePolicy,
    ) -> (Result<GenerationReport, ProcessError>, Vec<String>) {
        let mut lines = Vec::new();
        let result = generate_with_backend(
            backend,
            &tmp.path().join("src"),
            &tmp.path().join("out"),
            config,
            policy,
            |event| match event {
                ProcessEvent::VariantWritten(v) => {
                    lines.push(v.path.file_name().unwrap().to_string_lossy().into_owned())
                }
                ProcessEvent::SourceFailed { source, .. } => {
                    lines.push(format!("failed {}", source.display()))
                }
                ProcessEvent::SourceStarted { .. } => {}
            },
        );
        (result, lines)
    }

    #[test]
    fn sunset_example_produces_three_variants() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &["photo-sunset.jpg"]);
        let backend = MockBackend::with_sources(&[("photo-sunset.jpg", 3000, 2000)]);

        let (result, written) = run(
            &backend,
            &tmp,
            &config(&[480, 960, 1440], 82),
            FailurePolicy::Abort,
        );
        let report = result.unwrap();

        assert_eq!(
            written,
            vec![
                "photo-sunset-480.webp",
                "photo-sunset-960.webp",
                "photo-sunset-1440.webp"
            ]
        );
        let SourceOutcome::Generated { variants, native, .. } = &report.outcomes[0] else {
            panic!("expected generated outcome");
        };
        assert_eq!((native.width, native.height), (3000, 2000));
        let dims: Vec<(u32, u32)> = variants.iter().map(|v| (v.width, v.height)).collect();
        assert_eq!(dims, vec![(480, 320), (960, 640), (1440, 960)]);
    }

    #[test]
    fn output_count_is_sources_times_widths() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(
            &tmp.path().join("src"),
            &["photo-a.jpg", "photo-b.jpg", "photo-c.jpg", "notes.jpg"],
        );
        let backend = MockBackend::with_sources(&[
            ("photo-a.jpg", 2000, 1000),
            ("photo-b.jpg", 500, 500),
            ("photo-c.jpg", 1200, 1600),
        ]);

        let (result, _) = run(&backend, &tmp, &config(&[400, 800], 82), FailurePolicy::Abort);
        let report = result.unwrap();

        assert_eq!(report.source_count(), 3);
        assert_eq!(report.variant_count(), 6);
        assert!(report.is_success());
        assert_eq!(backend.written_outputs().len(), 6);
    }

    #[test]
    fn sources_processed_in_lexicographic_order() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &["photo-b.jpg", "photo-a.jpg"]);
        let backend =
            MockBackend::with_sources(&[("photo-a.jpg", 100, 100), ("photo-b.jpg", 100, 100)]);

        run(&backend, &tmp, &config(&[50], 82), FailurePolicy::Abort)
            .0
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops[0], RecordedOp::Decode("photo-a.jpg".to_string()));
        assert!(matches!(&ops[1], RecordedOp::Write { output, .. } if output == "photo-a-50.webp"));
        assert_eq!(ops[2], RecordedOp::Decode("photo-b.jpg".to_string()));
    }

    #[test]
    fn quality_and_effort_reach_backend() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &["photo-a.jpg"]);
        let backend = MockBackend::with_sources(&[("photo-a.jpg", 2000, 1500)]);

        run(&backend, &tmp, &config(&[800], 88), FailurePolicy::Abort)
            .0
            .unwrap();

        assert!(matches!(
            &backend.get_operations()[1],
            RecordedOp::Write { quality: 88, effort: 6, .. }
        ));
    }

    #[test]
    fn small_source_is_not_upscaled() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &["photo-small.jpg"]);
        let backend = MockBackend::with_sources(&[("photo-small.jpg", 800, 600)]);

        let report = run(&backend, &tmp, &config(&[480, 960], 82), FailurePolicy::Abort)
            .0
            .unwrap();

        let SourceOutcome::Generated { variants, .. } = &report.outcomes[0] else {
            panic!("expected generated outcome");
        };
        assert_eq!((variants[0].width, variants[0].height), (480, 360));
        assert_eq!((variants[1].width, variants[1].height), (800, 600));
        assert_eq!(
            variants[1].path.file_name().unwrap().to_str(),
            Some("photo-small-960.webp")
        );
    }

    #[test]
    fn missing_source_dir_aborts_before_output() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();

        let (result, written) = run(&backend, &tmp, &config(&[480], 82), FailurePolicy::Abort);

        assert!(matches!(result, Err(ProcessError::SourceDirNotFound(_))));
        assert!(written.is_empty());
        assert!(!tmp.path().join("out").exists());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn output_dir_is_created() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &[]);
        let backend = MockBackend::new();

        let report = run(&backend, &tmp, &config(&[480], 82), FailurePolicy::Abort)
            .0
            .unwrap();

        assert!(tmp.path().join("out").is_dir());
        assert_eq!(report.source_count(), 0);
        assert_eq!(report.variant_count(), 0);
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(
            &tmp.path().join("src"),
            &["photo-a.jpg", "photo-b.jpg", "photo-c.jpg"],
        );
        let backend = MockBackend::with_sources(&[
            ("photo-a.jpg", 1000, 1000),
            ("photo-c.jpg", 1000, 1000),
        ])
        .with_corrupt("photo-b.jpg");

        let (result, written) = run(&backend, &tmp, &config(&[500], 82), FailurePolicy::Abort);

        match result {
            Err(ProcessError::Imaging { path, .. }) => {
                assert!(path.ends_with("photo-b.jpg"));
            }
            other => panic!("expected imaging error, got {other:?}"),
        }
        // photo-a was written before the failure; photo-c never started
        assert_eq!(written, vec!["photo-a-500.webp"]);
        assert!(
            !backend
                .get_operations()
                .contains(&RecordedOp::Decode("photo-c.jpg".to_string()))
        );
    }

    #[test]
    fn continue_policy_records_failure_and_carries_on() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(
            &tmp.path().join("src"),
            &["photo-a.jpg", "photo-b.jpg", "photo-c.jpg"],
        );
        let backend = MockBackend::with_sources(&[
            ("photo-a.jpg", 1000, 1000),
            ("photo-c.jpg", 1000, 1000),
        ])
        .with_corrupt("photo-b.jpg");

        let (result, written) =
            run(&backend, &tmp, &config(&[500], 82), FailurePolicy::Continue);
        let report = result.unwrap();

        assert_eq!(report.source_count(), 3);
        assert_eq!(report.variant_count(), 2);
        assert!(!report.is_success());

        let failed: Vec<&str> = report
            .failed()
            .map(|o| o.source().base_name.as_str())
            .collect();
        assert_eq!(failed, vec!["photo-b"]);

        assert_eq!(written.len(), 3);
        assert!(written[1].starts_with("failed ") && written[1].ends_with("photo-b.jpg"));
        assert_eq!(written[2], "photo-c-500.webp");

        match report.ensure_success() {
            Err(ProcessError::SourcesFailed(paths)) => {
                assert_eq!(paths.len(), 1);
                assert!(paths[0].ends_with("photo-b.jpg"));
            }
            other => panic!("expected failed sources, got {other:?}"),
        }
    }

    #[test]
    fn clean_run_passes_ensure_success() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &["photo-a.jpg"]);
        let backend = MockBackend::with_sources(&[("photo-a.jpg", 1000, 1000)]);

        let report = run(&backend, &tmp, &config(&[500], 82), FailurePolicy::Continue)
            .0
            .unwrap();

        assert!(report.ensure_success().is_ok());
    }

    #[test]
    fn failed_sources_error_message_counts_sources() {
        let err = ProcessError::SourcesFailed(vec![
            PathBuf::from("photo-a.jpg"),
            PathBuf::from("photo-b.jpg"),
        ]);
        assert_eq!(err.to_string(), "2 source(s) could not be processed");
    }

    #[test]
    fn source_started_precedes_each_source() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &["photo-a.jpg", "photo-b.jpg"]);
        let backend = MockBackend::with_sources(&[("photo-a.jpg", 100, 100)])
            .with_corrupt("photo-b.jpg");

        let mut events = Vec::new();
        generate_with_backend(
            &backend,
            &tmp.path().join("src"),
            &tmp.path().join("out"),
            &config(&[50], 82),
            FailurePolicy::Continue,
            |event| {
                events.push(match event {
                    ProcessEvent::SourceStarted {
                        index,
                        total,
                        source,
                    } => format!(
                        "start {index}/{total} {}",
                        source.file_name().unwrap().to_string_lossy()
                    ),
                    ProcessEvent::VariantWritten(v) => {
                        format!("wrote {}", v.path.file_name().unwrap().to_string_lossy())
                    }
                    ProcessEvent::SourceFailed { .. } => "failed".to_string(),
                })
            },
        )
        .unwrap();

        assert_eq!(
            events,
            vec![
                "start 1/2 photo-a.jpg",
                "wrote photo-a-50.webp",
                "start 2/2 photo-b.jpg",
                "failed",
            ]
        );
    }

    #[test]
    fn plan_reads_headers_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(&tmp.path().join("src"), &["photo-a.jpg", "photo-b.jpg"]);
        let backend = MockBackend::with_sources(&[("photo-a.jpg", 3000, 2000)])
            .with_corrupt("photo-b.jpg");

        let plans = plan_with_backend(
            &backend,
            &tmp.path().join("src"),
            &tmp.path().join("out"),
            &config(&[480, 960], 82),
        )
        .unwrap();

        assert_eq!(plans.len(), 2);
        let (native, variants) = plans[0].plan.as_ref().unwrap();
        assert_eq!((native.width, native.height), (3000, 2000));
        let (size, params) = &variants[1];
        assert_eq!(size.target_width, 960);
        assert_eq!(params.output, tmp.path().join("out/photo-a-960.webp"));
        assert_eq!((params.width, params.height), (960, 640));
        assert!(plans[1].plan.is_err());

        assert!(!tmp.path().join("out").exists());
        assert!(
            backend
                .get_operations()
                .iter()
                .all(|op| matches!(op, RecordedOp::Identify(_)))
        );
    }

    #[test]
    fn plan_missing_source_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = plan_with_backend(
            &MockBackend::new(),
            &tmp.path().join("src"),
            &tmp.path().join("out"),
            &GeneratorConfig::default(),
        );
        assert!(matches!(result, Err(ProcessError::SourceDirNotFound(_))));
    }
}
