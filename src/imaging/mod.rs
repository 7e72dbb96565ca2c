//! Image processing: cover-fit resize and anchored crop, then re-encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Geometry** | [`resolve_draw_rect`] (pure) |
//! | **Render** | `imageops::resize` (CatmullRom) + `imageops::replace` |
//! | **Encode** | JPEG / AVIF with quality, PNG / WebP / TIFF lossless |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for cover-fit geometry (unit testable)
//! - **Parameters**: Data structures describing a conversion
//! - **Render**: In-memory cover-fit of a decoded image
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod render;
pub mod rust_backend;

pub use backend::{ConvertError, ImageBackend};
pub use calculations::{
    Alignment, Anchor, Dimensions, DrawRect, HorizontalAlign, VerticalAlign, resolve_draw_rect,
};
pub use operations::{ConvertConfig, convert_file, get_dimensions};
pub use params::{ConvertParams, ConvertReport, EncodingSpec, OutputFormat, Quality};
pub use render::{convert, cover_fit, render};
pub use rust_backend::{RustBackend, identify, supported_input_extensions};
