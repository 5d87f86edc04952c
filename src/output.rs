//! CLI output formatting.
//!
//! ## Generate
//!
//! ```text
//! photo-sunset.jpg (1/2)
//! Generated images/optimized/photo-sunset-480.webp
//! Generated images/optimized/photo-sunset-960.webp
//! photo-broken.jpg (2/2)
//! Skipped images/Images/photo-broken.jpg: Failed to decode ...
//! Done: 2 variants from 2 sources, 1 failed
//! ```
//!
//! ## Check
//!
//! ```text
//! photo-small.jpg (800x600)
//!     480px → images/optimized/photo-small-480.webp (480x360)
//!     960px → images/optimized/photo-small-960.webp (800x600, native)
//! 1 source, 2 variants planned
//! ```
//!
//! Paths are shown relative to the project root. Each `format_*` function
//! returns lines and does no I/O; the `print_*` wrappers write to stdout.

use crate::config::ProjectLayout;
use crate::process::{GenerationReport, ProcessEvent, SourcePlan};

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent, layout: &ProjectLayout) -> Vec<String> {
    match event {
        ProcessEvent::SourceStarted {
            index,
            total,
            source,
        } => {
            let name = source
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| layout.display_path(source));
            vec![format!("{} ({}/{})", name, index, total)]
        }
        ProcessEvent::VariantWritten(variant) => {
            vec![format!("Generated {}", layout.display_path(&variant.path))]
        }
        ProcessEvent::SourceFailed { source, error } => {
            vec![format!("Skipped {}: {}", layout.display_path(source), error)]
        }
    }
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent, layout: &ProjectLayout) {
    for line in format_process_event(event, layout) {
        println!("{}", line);
    }
}

/// Final completion line for a generate run.
pub fn format_summary(report: &GenerationReport) -> String {
    let failed = report.failed().count();
    let mut line = format!(
        "Done: {} from {}",
        plural(report.variant_count(), "variant"),
        plural(report.source_count(), "source")
    );
    if failed > 0 {
        line.push_str(&format!(", {failed} failed"));
    }
    line
}

pub fn print_summary(report: &GenerationReport) {
    println!("{}", format_summary(report));
}

/// Format the `check` listing: each source with its planned variants.
pub fn format_plan(plans: &[SourcePlan], layout: &ProjectLayout) -> Vec<String> {
    let mut lines = Vec::new();
    let mut planned = 0;

    for source_plan in plans {
        let name = source_plan
            .source
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_plan.source.base_name.clone());

        match &source_plan.plan {
            Ok((native, variants)) => {
                lines.push(format!("{} ({}x{})", name, native.width, native.height));
                for (size, params) in variants {
                    let native_note = if size.is_native(*native) { ", native" } else { "" };
                    lines.push(format!(
                        "    {}px \u{2192} {} ({}x{}{})",
                        size.target_width,
                        layout.display_path(&params.output),
                        size.width,
                        size.height,
                        native_note
                    ));
                }
                planned += variants.len();
            }
            Err(e) => {
                lines.push(format!("{} (unreadable: {})", name, e));
            }
        }
    }

    lines.push(format!(
        "{}, {} planned",
        plural(plans.len(), "source"),
        plural(planned, "variant")
    ));
    lines
}

pub fn print_plan(plans: &[SourcePlan], layout: &ProjectLayout) {
    for line in format_plan(plans, layout) {
        println!("{}", line);
    }
}
