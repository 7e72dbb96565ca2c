//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what images to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (0-100, default 90). Rejected, not
//!   clamped, when out of range.
//! - [`OutputFormat`]: encoded output format. JPEG and AVIF are lossy, the
//!   rest lossless.
//! - [`EncodingSpec`]: format + quality pair handed to the encoder.
//! - [`ConvertParams`]: everything one conversion needs.
//! - [`ConvertReport`]: what a finished conversion resolved.

use super::backend::ConvertError;
use super::calculations::{Alignment, Dimensions, DrawRect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Result<Self, ConvertError> {
        if value > 100 {
            return Err(ConvertError::Validation(format!(
                "quality must be 0-100, got {value}"
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output encodings the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    #[value(name = "webp")]
    WebP,
    Tiff,
    Avif,
}

/// Extension → format mapping, first entry per format is the canonical one.
const EXTENSIONS: &[(&str, OutputFormat)] = &[
    ("jpg", OutputFormat::Jpeg),
    ("jpeg", OutputFormat::Jpeg),
    ("png", OutputFormat::Png),
    ("webp", OutputFormat::WebP),
    ("tif", OutputFormat::Tiff),
    ("tiff", OutputFormat::Tiff),
    ("avif", OutputFormat::Avif),
];

impl OutputFormat {
    /// Whether the encoder discards information and honours [`Quality`].
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Avif)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Tiff => "image/tiff",
            OutputFormat::Avif => "image/avif",
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        EXTENSIONS
            .iter()
            .find(|(_, fmt)| *fmt == self)
            .map(|(ext, _)| *ext)
            .unwrap_or("img")
    }

    /// Look up a format by file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Result<Self, ConvertError> {
        EXTENSIONS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
            .map(|(_, fmt)| *fmt)
            .ok_or_else(|| ConvertError::Encode(format!("no encoder registered for .{ext}")))
    }

    /// Infer the format from an output path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ConvertError::Encode(format!(
                "cannot infer output format from {}",
                path.display()
            ))
        })?;
        Self::from_extension(ext)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Avif => "avif",
        })
    }
}

/// Output format plus quality. Quality only affects lossy formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingSpec {
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Parameters for a single cover-fit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub target: Dimensions,
    pub alignment: Alignment,
    pub encoding: EncodingSpec,
}

/// Geometry resolved while converting one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertReport {
    /// Decoded size of the source.
    pub source: Dimensions,
    pub rect: DrawRect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_accepts_bounds() {
        assert_eq!(Quality::new(0).unwrap().value(), 0);
        assert_eq!(Quality::new(100).unwrap().value(), 100);
    }

    #[test]
    fn quality_rejects_101() {
        assert!(matches!(
            Quality::new(101),
            Err(ConvertError::Validation(_))
        ));
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn lossy_formats() {
        assert!(OutputFormat::Jpeg.is_lossy());
        assert!(OutputFormat::Avif.is_lossy());
        assert!(!OutputFormat::Png.is_lossy());
        assert!(!OutputFormat::WebP.is_lossy());
        assert!(!OutputFormat::Tiff.is_lossy());
    }

    #[test]
    fn canonical_extensions() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Tiff.extension(), "tif");
        assert_eq!(OutputFormat::WebP.extension(), "webp");
    }

    #[test]
    fn from_extension_is_case_insensitive() {
        assert_eq!(
            OutputFormat::from_extension("JPEG").unwrap(),
            OutputFormat::Jpeg
        );
        assert_eq!(
            OutputFormat::from_extension("Png").unwrap(),
            OutputFormat::Png
        );
    }

    #[test]
    fn from_extension_unknown_is_encode_error() {
        assert!(matches!(
            OutputFormat::from_extension("gif"),
            Err(ConvertError::Encode(_))
        ));
    }

    #[test]
    fn from_path_infers_format() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/thumb.avif")).unwrap(),
            OutputFormat::Avif
        );
        assert!(OutputFormat::from_path(Path::new("out/thumb")).is_err());
    }

    #[test]
    fn mime_types() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::WebP.mime_type(), "image/webp");
    }

    #[test]
    fn format_parses_from_toml_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: OutputFormat,
        }
        let w: Wrapper = toml::from_str("format = \"webp\"").unwrap();
        assert_eq!(w.format, OutputFormat::WebP);
        let w: Wrapper = toml::from_str("format = \"jpeg\"").unwrap();
        assert_eq!(w.format, OutputFormat::Jpeg);
    }
}
