//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{ConvertError, ImageBackend};
use super::calculations::{Alignment, Dimensions};
use super::params::{ConvertParams, ConvertReport, EncodingSpec, OutputFormat, Quality};
use super::rust_backend::RustBackend;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    backend.identify(path)
}

/// Everything a conversion needs besides the two paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertConfig {
    pub target: Dimensions,
    pub alignment: Alignment,
    pub format: OutputFormat,
    pub quality: Quality,
}

impl ConvertConfig {
    /// Build a config from raw values, validating dimensions and quality.
    pub fn new(
        width: u32,
        height: u32,
        alignment: Alignment,
        format: OutputFormat,
        quality: u32,
    ) -> Result<Self> {
        Ok(Self {
            target: Dimensions::new(width, height)?,
            alignment,
            format,
            quality: Quality::new(quality)?,
        })
    }
}

/// Plan a conversion without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_conversion(source: &Path, output: &Path, config: &ConvertConfig) -> ConvertParams {
    ConvertParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        target: config.target,
        alignment: config.alignment,
        encoding: EncodingSpec {
            format: config.format,
            quality: config.quality,
        },
    }
}

/// Convert one file with the given backend.
pub fn convert_with_backend(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<ConvertReport> {
    let params = plan_conversion(source, output, config);
    backend.convert(&params)
}

/// Decode `source`, cover-fit it to `config.target`, and write `output`.
///
/// Parent directories of `output` are created as needed. The file appears
/// at `output` only once it has been fully encoded. Returns the decoded
/// source size and the draw rectangle that was applied.
pub fn convert_file(
    source: &Path,
    output: &Path,
    config: &ConvertConfig,
) -> Result<ConvertReport> {
    convert_with_backend(&RustBackend::new(), source, output, config)
}
