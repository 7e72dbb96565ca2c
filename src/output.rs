//! CLI output formatting for all commands.
//!
//! # Output Format
//!
//! ## Convert
//!
//! ```text
//! photos/dawn.jpg (4000x3000) → thumbs/dawn.jpg
//!     Size: 800x800 (jpeg, quality 90)
//!     Align: middle/middle
//!     Draw: 1067x800 at (-133, 0)
//! ```
//!
//! ## Batch
//!
//! ```text
//! Converting 3 images
//!     001 dawn.jpg → dawn.jpg
//!     002 broken.jpg: Failed to decode broken.jpg: ...
//!     003 travel/rome.png → travel/rome.jpg
//! 2 converted, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::batch::{BatchEvent, BatchResult};
use crate::imaging::{Alignment, Dimensions, DrawRect, EncodingSpec};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_encoding(encoding: &EncodingSpec) -> String {
    if encoding.format.is_lossy() {
        format!("{}, quality {}", encoding.format, encoding.quality.value())
    } else {
        encoding.format.to_string()
    }
}

// ============================================================================
// Convert
// ============================================================================

/// Everything worth reporting about one finished conversion.
pub struct ConvertSummary<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
    pub source_dims: Dimensions,
    pub target: Dimensions,
    pub alignment: Alignment,
    pub rect: DrawRect,
    pub encoding: EncodingSpec,
}

pub fn format_convert_output(summary: &ConvertSummary<'_>) -> Vec<String> {
    let rect = &summary.rect;
    vec![
        format!(
            "{} ({}) → {}",
            summary.source.display(),
            summary.source_dims,
            summary.output.display()
        ),
        format!(
            "{}Size: {} ({})",
            indent(1),
            summary.target,
            format_encoding(&summary.encoding)
        ),
        format!("{}Align: {}", indent(1), summary.alignment),
        format!(
            "{}Draw: {}x{} at ({}, {})",
            indent(1),
            rect.draw_width,
            rect.draw_height,
            rect.offset_x,
            rect.offset_y
        ),
    ]
}

pub fn print_convert_output(summary: &ConvertSummary<'_>) {
    for line in format_convert_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Identify
// ============================================================================

pub fn format_identify_output(path: &Path, dims: Dimensions) -> String {
    format!("{}: {}", path.display(), dims)
}

// ============================================================================
// Batch
// ============================================================================

pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => {
            let noun = if *total == 1 { "image" } else { "images" };
            vec![format!("Converting {} {}", total, noun)]
        }
        BatchEvent::Converted {
            index,
            source,
            output,
        } => vec![format!(
            "{}{} {} → {}",
            indent(1),
            format_index(*index),
            source,
            output
        )],
        BatchEvent::Failed {
            index,
            source,
            error,
        } => vec![format!(
            "{}{} {}: {}",
            indent(1),
            format_index(*index),
            source,
            error
        )],
    }
}

pub fn format_batch_summary(result: &BatchResult) -> Vec<String> {
    let mut lines = vec![result.to_string()];
    if !result.failed.is_empty() {
        lines.push("Failed:".to_string());
        for failure in &result.failed {
            lines.push(format!("{}{}", indent(1), failure.source.display()));
            lines.push(format!("{}{}", indent(2), failure.error));
        }
    }
    lines
}

pub fn print_batch_summary(result: &BatchResult) {
    for line in format_batch_summary(result) {
        println!("{}", line);
    }
}
