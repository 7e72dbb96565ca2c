//! # Coverfit
//!
//! Resize images to exact pixel dimensions without distortion: scale the
//! source uniformly until it covers the target, then crop the overflow
//! according to a vertical and horizontal alignment.
//!
//! # Pipeline
//!
//! ```text
//! 1. Decode    source file      →  DynamicImage   (format sniffed from content)
//! 2. Resolve   source + target  →  DrawRect       (pure geometry)
//! 3. Render    image + DrawRect →  target canvas  (crop visible window, one bicubic resize)
//! 4. Encode    canvas           →  output file    (temp file, then rename)
//! ```
//!
//! Geometry is a pure function of three values, so every cropping decision can
//! be tested without touching pixels or the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Cover-fit geometry, rendering, decode/encode, the backend seam |
//! | [`batch`] | Recursive directory conversion on a rayon pool |
//! | [`config`] | `config.toml` loading, merging, and validation for batch runs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Cover, Never Contain
//!
//! The output always has exactly the requested dimensions and is always
//! fully covered by image content. One axis matches the target exactly, the
//! other overflows and is cropped. There is no letterboxing mode.
//!
//! ## Ratios in Floating Point
//!
//! Both scale branches compute the ratio as `f64` and round the scaled length
//! to the nearest pixel. Integer division would truncate ratios below 1 to
//! zero.
//!
//! ## Atomic Writes
//!
//! Encoded bytes go to a temporary file next to the destination and are
//! renamed into place. A failed or interrupted encode never leaves a
//! truncated image at the output path.
//!
//! ## Pure-Rust Codecs
//!
//! Decoding and encoding use the `image` crate only (AVIF encoding via its
//! bundled `ravif`). The binary has no system library dependencies.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
