//! Generator configuration and project layout.
//!
//! Settings come from an optional JSON file, `images/optimized-sources.json`
//! by default. Every key is optional; a missing file or a missing key falls
//! back to the built-in defaults:
//!
//! ```json
//! {
//!   "widths": [480, 960, 1440],
//!   "quality": 82
//! }
//! ```
//!
//! - `widths`: target pixel widths, in output order. Non-empty, positive, no duplicates.
//! - `quality`: lossy WebP quality, 0-100.
//!
//! Other keys are ignored so the file can be shared with other tooling.
//! The config is loaded once in `main` and passed by reference afterwards.

use crate::imaging::{Effort, Quality, VariantConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default settings file, relative to the project root.
pub const DEFAULT_CONFIG_FILE: &str = "images/optimized-sources.json";
/// Default source directory, relative to the project root.
pub const DEFAULT_SOURCE_DIR: &str = "images/Images";
/// Default output directory, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "images/optimized";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Responsive image generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Target pixel widths, one variant per width per source.
    pub widths: Vec<u32>,
    /// WebP encoding quality (0 = worst, 100 = best).
    pub quality: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            widths: vec![480, 960, 1440],
            quality: 82,
        }
    }
}

impl GeneratorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.widths.is_empty() {
            return Err(ConfigError::Validation("widths must not be empty".into()));
        }
        if self.widths.contains(&0) {
            return Err(ConfigError::Validation(
                "widths must be positive integers".into(),
            ));
        }
        for (i, width) in self.widths.iter().enumerate() {
            if self.widths[..i].contains(width) {
                return Err(ConfigError::Validation(format!(
                    "width {width} is listed more than once"
                )));
            }
        }
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        Ok(())
    }

    /// Encoder settings for the imaging layer. Effort is always maximal.
    pub fn variant_config(&self) -> VariantConfig {
        VariantConfig {
            widths: self.widths.clone(),
            quality: Quality::new(self.quality),
            effort: Effort::MAX,
        }
    }
}

/// Parse a settings document and validate the result.
pub fn parse_config(content: &str, path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let config: GeneratorConfig =
        serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Load the settings file at `path`.
///
/// Returns the defaults if the file does not exist.
/// Returns `Err` if it exists but cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    if !path.exists() {
        return Ok(GeneratorConfig::default());
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

/// Pretty-printed default settings file, used by the `gen-config` command.
pub fn stock_config_json() -> String {
    let mut json = serde_json::to_string_pretty(&GeneratorConfig::default())
        .expect("default config must serialize");
    json.push('\n');
    json
}

/// Filesystem locations the generator works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Project root; console output is relative to it.
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ProjectLayout {
    /// Default layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source_dir: root.join(DEFAULT_SOURCE_DIR),
            output_dir: root.join(DEFAULT_OUTPUT_DIR),
            config_file: root.join(DEFAULT_CONFIG_FILE),
            root,
        }
    }

    /// Resolve a user-supplied path: relative paths are taken from the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Path relative to the project root, for display. Falls back to the full path.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
