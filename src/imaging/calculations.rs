//! Pure geometry for cover-fit resizing.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! ## Cover-fit
//!
//! The source is scaled uniformly until it covers the whole target frame.
//! One axis matches the target exactly; the other overflows and is cropped.
//! Which part of the overflow survives is decided by the [`Alignment`].
//!
//! ```text
//! source 400x200, target 300x300, middle/middle
//!
//!   scale = 300 / 200 = 1.5  →  draw 600x300
//!   overflow = 600 - 300 = 300
//!
//!   -150          0         300         450
//!    +-----------+-----------+-----------+
//!    |  cropped  |  canvas   |  cropped  |
//!    +-----------+-----------+-----------+
//! ```

use super::backend::ConvertError;
use serde::{Deserialize, Serialize};

/// Pixel extent of an image or target frame. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Build dimensions, rejecting a zero width or height.
    pub fn new(width: u32, height: u32) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::Validation(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Position of the visible window along one axis of the overflowing image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Center,
    End,
}

impl Anchor {
    /// Offset at which the scaled image is drawn along this axis.
    ///
    /// `Start` keeps the leading edge (offset 0), `End` keeps the trailing
    /// edge (offset `-overflow`), and `Center` sits at `-(overflow / 2)`
    /// with integer truncation.
    pub fn offset(self, overflow: u32) -> i64 {
        let overflow = i64::from(overflow);
        match self {
            Anchor::Start => 0,
            Anchor::Center => -(overflow / 2),
            Anchor::End => -overflow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn anchor(self) -> Anchor {
        match self {
            VerticalAlign::Top => Anchor::Start,
            VerticalAlign::Middle => Anchor::Center,
            VerticalAlign::Bottom => Anchor::End,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Middle,
    Right,
}

impl HorizontalAlign {
    pub fn anchor(self) -> Anchor {
        match self {
            HorizontalAlign::Left => Anchor::Start,
            HorizontalAlign::Middle => Anchor::Center,
            HorizontalAlign::Right => Anchor::End,
        }
    }
}

/// Which edge or center of the overflowing image stays visible after crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub vertical: VerticalAlign,
    pub horizontal: HorizontalAlign,
}

impl Alignment {
    pub fn new(vertical: VerticalAlign, horizontal: HorizontalAlign) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Centered on both axes.
    pub fn center() -> Self {
        Self::new(VerticalAlign::Middle, HorizontalAlign::Middle)
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::center()
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = match self.vertical {
            VerticalAlign::Top => "top",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Bottom => "bottom",
        };
        let h = match self.horizontal {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Middle => "middle",
            HorizontalAlign::Right => "right",
        };
        write!(f, "{v}/{h}")
    }
}

/// Where, and at what size, the source is blitted onto the target canvas.
///
/// Negative offsets mean part of the scaled image lies outside the canvas
/// and is cropped away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub offset_x: i64,
    pub offset_y: i64,
    pub draw_width: u32,
    pub draw_height: u32,
}

impl DrawRect {
    /// Uniform scale applied to the source (draw size over source size).
    pub fn scale_factor(&self, source: Dimensions) -> f64 {
        f64::from(self.draw_width) / f64::from(source.width)
    }

    /// True when the rectangle, clipped to a canvas of `target` size,
    /// leaves no canvas pixel uncovered.
    pub fn covers(&self, target: Dimensions) -> bool {
        self.offset_x <= 0
            && self.offset_y <= 0
            && self.offset_x + i64::from(self.draw_width) >= i64::from(target.width)
            && self.offset_y + i64::from(self.draw_height) >= i64::from(target.height)
    }
}

/// Scale `length` by `ratio`, rounding half away from zero.
///
/// Used for both axes so width and height never disagree on rounding.
fn scale_length(length: u32, ratio: f64) -> u32 {
    (f64::from(length) * ratio).round() as u32
}

/// Resolve the draw rectangle that covers `target` with `source`.
///
/// The height is matched first. If the resulting width overflows, the image
/// is cropped horizontally; if it falls short, the width is matched instead
/// and the image is cropped vertically.
///
/// # Examples
/// ```
/// use coverfit::imaging::{Alignment, Dimensions, resolve_draw_rect};
///
/// let source = Dimensions::new(400, 200).unwrap();
/// let target = Dimensions::new(300, 300).unwrap();
/// let rect = resolve_draw_rect(source, target, Alignment::center());
/// assert_eq!((rect.offset_x, rect.offset_y), (-150, 0));
/// assert_eq!((rect.draw_width, rect.draw_height), (600, 300));
/// ```
pub fn resolve_draw_rect(source: Dimensions, target: Dimensions, align: Alignment) -> DrawRect {
    let height_ratio = f64::from(target.height) / f64::from(source.height);
    let scaled_width = scale_length(source.width, height_ratio);

    if scaled_width == target.width {
        return DrawRect {
            offset_x: 0,
            offset_y: 0,
            draw_width: target.width,
            draw_height: target.height,
        };
    }

    if scaled_width > target.width {
        // Too wide: height matches, crop horizontally
        let overflow = scaled_width - target.width;
        DrawRect {
            offset_x: align.horizontal.anchor().offset(overflow),
            offset_y: 0,
            draw_width: scaled_width,
            draw_height: target.height,
        }
    } else {
        // Too tall: width matches, crop vertically
        let width_ratio = f64::from(target.width) / f64::from(source.width);
        let scaled_height = scale_length(source.height, width_ratio);
        // scaled_width < target.width implies scaled_height >= target.height
        let overflow = scaled_height - target.height;
        DrawRect {
            offset_x: 0,
            offset_y: align.vertical.anchor().offset(overflow),
            draw_width: target.width,
            draw_height: scaled_height,
        }
    }
}
