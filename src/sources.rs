//! Source photograph discovery.
//!
//! Sources are the files (or symlinks to files) directly inside the source
//! directory whose names match `photo-*.jpg`. Matching is case-sensitive: `Photo-a.jpg` and
//! `photo-a.JPG` are ignored. Results are sorted by file name so runs are
//! deterministic.

use std::fs;
use std::path::{Path, PathBuf};

/// Literal prefix every source file name starts with.
pub const SOURCE_PREFIX: &str = "photo-";
/// Literal extension every source file name ends with.
pub const SOURCE_EXTENSION: &str = "jpg";

/// A discovered source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    /// File stem, e.g. `photo-sunset` for `photo-sunset.jpg`.
    pub base_name: String,
}

/// Return the base name if `file_name` matches `photo-*.jpg`.
///
/// The `*` may be empty, as with a shell glob.
pub fn match_source_name(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(SOURCE_EXTENSION)?.strip_suffix('.')?;
    stem.starts_with(SOURCE_PREFIX).then_some(stem)
}

/// List matching sources in `dir`, sorted lexicographically by file name.
///
/// Entries that cannot be read and file names that are not valid UTF-8 are
/// skipped with a warning.
pub fn discover_sources(dir: &Path) -> std::io::Result<Vec<SourceImage>> {
    let mut sources = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(dir = %dir.display(), %error, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if let Some(base_name) = match_source_name(&name) {
            sources.push(SourceImage {
                base_name: base_name.to_string(),
                path,
            });
        }
    }

    sources.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(sources)
}
