//! In-memory render: cover-fit one image onto a canvas of exact size.
//!
//! No file I/O happens here, so the functions can be embedded in any larger
//! pipeline that already holds a decoded [`DynamicImage`].

use super::backend::ConvertError;
use super::calculations::{Alignment, Dimensions, DrawRect, resolve_draw_rect};
use super::params::ConvertReport;
use image::DynamicImage;
use image::imageops::{self, FilterType};

/// Bicubic resampling for both up- and downscaling.
const FILTER: FilterType = FilterType::CatmullRom;

/// Map the visible part of one axis of the draw rect back onto the source.
///
/// Returns `(start, len)` in source pixels, clamped to the source extent and
/// never empty.
fn source_window(offset: i64, draw_len: u32, source_len: u32, target_len: u32) -> (u32, u32) {
    let scale = f64::from(draw_len) / f64::from(source_len);
    let start = ((-offset).max(0) as f64 / scale).round() as u32;
    let start = start.min(source_len - 1);
    let len = (f64::from(target_len) / scale).round().max(1.0) as u32;
    (start, len.min(source_len - start))
}

/// Cover-fit `source` onto a `target`-sized canvas and report the geometry.
///
/// Only the source region that lands on the canvas is resampled, so memory
/// stays proportional to the source and target, never to the overflow.
pub fn cover_fit(
    source: &DynamicImage,
    target: Dimensions,
    align: Alignment,
) -> Result<(DynamicImage, ConvertReport), ConvertError> {
    let source_dims = Dimensions::new(source.width(), source.height())?;
    let rect = resolve_draw_rect(source_dims, target, align);
    log::debug!(
        "render {} -> {} ({}): draw {}x{} at ({}, {}), scale {:.4}",
        source_dims,
        target,
        align,
        rect.draw_width,
        rect.draw_height,
        rect.offset_x,
        rect.offset_y,
        rect.scale_factor(source_dims),
    );

    let canvas = draw(source, source_dims, rect, target);
    let report = ConvertReport {
        source: source_dims,
        rect,
    };
    Ok((canvas, report))
}

fn draw(
    source: &DynamicImage,
    source_dims: Dimensions,
    rect: DrawRect,
    target: Dimensions,
) -> DynamicImage {
    let (x, width) =
        source_window(rect.offset_x, rect.draw_width, source_dims.width, target.width);
    let (y, height) =
        source_window(rect.offset_y, rect.draw_height, source_dims.height, target.height);

    let window = imageops::crop_imm(&source.to_rgba8(), x, y, width, height).to_image();
    let canvas = if (width, height) == (target.width, target.height) {
        window
    } else {
        imageops::resize(&window, target.width, target.height, FILTER)
    };
    DynamicImage::ImageRgba8(canvas)
}

/// Render `source` onto a new `target`-sized canvas.
///
/// The visible window of the source is scaled once, straight to the target
/// size. A window that already has the target size is copied without
/// resampling.
pub fn render(
    source: &DynamicImage,
    target: Dimensions,
    align: Alignment,
) -> Result<DynamicImage, ConvertError> {
    cover_fit(source, target, align).map(|(canvas, _)| canvas)
}

/// Cover-fit an owned image, consuming it.
///
/// Convenience for callers that no longer need the source once rendered.
pub fn convert(
    image: DynamicImage,
    target: Dimensions,
    align: Alignment,
) -> Result<DynamicImage, ConvertError> {
    render(&image, target, align)
}
