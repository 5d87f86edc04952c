//! # webp-sizes
//!
//! Build-time asset preparation for the control panel: every `photo-*.jpg`
//! in the source directory becomes a set of lossy WebP files, one per
//! configured target width.
//!
//! ```text
//! images/Images/photo-sunset.jpg (3000x2000)
//!   → images/optimized/photo-sunset-480.webp   (480x320)
//!   → images/optimized/photo-sunset-960.webp   (960x640)
//!   → images/optimized/photo-sunset-1440.webp  (1440x960)
//! ```
//!
//! Sources are never upscaled: a target wider than the source yields a
//! native-resolution file that still carries the target width in its name,
//! so the markup can reference a fixed set of file names.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | JSON settings (`widths`, `quality`) with per-key defaults; project layout |
//! | [`sources`] | `photo-*.jpg` discovery in lexicographic order |
//! | [`imaging`] | Dimension math, backend trait, `image` + `webp` implementation |
//! | [`process`] | The batch pass: per-source outcomes, failure policy, `check` planning |
//! | [`output`] | Console line formatting |
//!
//! # Design Decisions
//!
//! ## Decode Once Per Source
//!
//! A source is decoded a single time and every width is produced from the
//! same in-memory RGB buffer. The buffer is owned by the per-source scope
//! in [`imaging::create_variants`], so it is freed as soon as the last
//! variant is written or the first error returns.
//!
//! ## Lossy WebP Through libwebp
//!
//! The `image` crate only encodes lossless WebP. Photographs need the lossy
//! encoder with a quality knob, so encoding goes through the `webp` crate
//! (libwebp) at compression method 6.
//!
//! ## Sequential By Design
//!
//! The tool runs once per asset change on a handful of photos. There is no
//! thread pool; sources and widths are processed one at a time.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
pub mod sources;
