//! Batch configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files for the
//! `batch` command. Stock defaults are overridden by a user config file,
//! either found in the source directory or passed explicitly.
//!
//! ## Config File Location
//!
//! ```text
//! photos/
//! ├── config.toml              # Picked up by `coverfit batch photos/ out/`
//! ├── 001-dawn.jpg
//! └── travel/
//!     └── rome.png
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! width = 800               # Target width in pixels
//! height = 800              # Target height in pixels
//! format = "jpeg"           # jpeg | png | webp | tiff | avif
//! quality = 90              # Lossy encoding quality (0-100)
//!
//! [alignment]
//! vertical = "middle"       # top | middle | bottom
//! horizontal = "middle"     # left | middle | right
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! # Square 1:1 avatars anchored to the top of the frame
//! [output]
//! width = 256
//! height = 256
//!
//! [alignment]
//! vertical = "top"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Alignment, ConvertConfig, HorizontalAlign, OutputFormat, VerticalAlign};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target size and encoding.
    pub output: OutputConfig,
    /// Which part of the overflowing image survives the crop.
    pub alignment: AlignmentConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.width == 0 || self.output.height == 0 {
            return Err(ConfigError::Validation(
                "output.width and output.height must be positive".into(),
            ));
        }
        if self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 0-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The per-image conversion settings this config describes.
    pub fn convert_config(&self) -> Result<ConvertConfig, ConfigError> {
        ConvertConfig::new(
            self.output.width,
            self.output.height,
            self.alignment.to_alignment(),
            self.output.format,
            self.output.quality,
        )
        .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// Target size and encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Only used by lossy formats (JPEG, AVIF).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            format: OutputFormat::Jpeg,
            quality: 90,
        }
    }
}

/// Crop anchor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignmentConfig {
    pub vertical: VerticalAlign,
    pub horizontal: HorizontalAlign,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            vertical: VerticalAlign::Middle,
            horizontal: HorizontalAlign::Middle,
        }
    }
}

impl AlignmentConfig {
    pub fn to_alignment(&self) -> Alignment {
        Alignment::new(self.vertical, self.horizontal)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel conversion workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a TOML file as a raw value.
pub fn load_raw_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    load_raw_file(&config_path).map(Some)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Load config from an explicit file path, merged over stock defaults.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    resolve_config(stock_defaults_value(), Some(load_raw_file(path)?))
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# coverfit Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as config.toml in the batch source directory, or pass
# it explicitly with `coverfit batch --config <FILE>`.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Exact pixel size of every generated image. The source is scaled to cover
# this frame and the overflow is cropped.
width = 800
height = 800

# Encoded format: "jpeg", "png", "webp", "tiff" or "avif".
format = "jpeg"

# Encoding quality for lossy formats (0 = worst, 100 = best).
# Ignored by png, webp and tiff, which are lossless.
quality = 90

# ---------------------------------------------------------------------------
# Crop anchor
# ---------------------------------------------------------------------------
[alignment]
# Which part stays visible when the scaled image is taller than the frame.
# "top", "middle" or "bottom".
vertical = "middle"

# Which part stays visible when the scaled image is wider than the frame.
# "left", "middle" or "right".
horizontal = "middle"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel conversion workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
