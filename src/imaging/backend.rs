//! Image conversion backend trait and error taxonomy.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and convert.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use a recording mock so batch logic can be exercised without
//! decoding or encoding a single pixel.

use super::calculations::Dimensions;
use super::params::{ConvertParams, ConvertReport};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every way a conversion can fail. Nothing is retried internally.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Non-positive dimensions or quality outside 0-100.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Missing, unreadable or unrecognized source image.
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    /// No encoder for the requested format, or the encoder itself failed.
    #[error("Encode error: {0}")]
    Encode(String),
    /// Filesystem failure creating directories or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for image conversion backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, ConvertError>;

    /// Decode, cover-fit, crop, encode and write one image.
    fn convert(&self, params: &ConvertParams) -> Result<ConvertReport, ConvertError>;
}
