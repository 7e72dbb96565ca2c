//! Pure Rust conversion backend built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Cover-fit + crop | [`cover_fit`](super::render::cover_fit): `imageops::crop_imm` + `imageops::resize` (`CatmullRom`) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//! | Encode → PNG / TIFF / WebP | lossless `image` encoders |
//! | Atomic write | `tempfile::NamedTempFile` in the output directory, persisted on success |

use super::backend::{ConvertError, ImageBackend};
use super::calculations::Dimensions;
use super::params::{ConvertParams, ConvertReport, EncodingSpec, OutputFormat};
use super::render::cover_fit;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
///
/// AVIF is absent on purpose: the `image` crate's `"avif"` feature only
/// enables the **encoder** (rav1e).
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

const OUTPUT_CANDIDATES: &[(OutputFormat, ImageFormat)] = &[
    (OutputFormat::Jpeg, ImageFormat::Jpeg),
    (OutputFormat::Png, ImageFormat::Png),
    (OutputFormat::WebP, ImageFormat::WebP),
    (OutputFormat::Tiff, ImageFormat::Tiff),
    (OutputFormat::Avif, ImageFormat::Avif),
];

/// Output formats with a compiled-in encoder. Built once, never mutated.
static ENCODERS: LazyLock<Vec<OutputFormat>> = LazyLock::new(|| {
    OUTPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.writing_enabled())
        .map(|(out, _)| *out)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Returns the output formats that have working encoders compiled in.
pub fn registered_output_formats() -> &'static [OutputFormat] {
    &ENCODERS
}

/// True if `path` has an extension we can decode.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> ConvertError {
    ConvertError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Load and decode an image from disk, sniffing the format from content.
pub fn load_image(path: &Path) -> Result<DynamicImage, ConvertError> {
    ImageReader::open(path)
        .map_err(|e| decode_error(path, e))?
        .with_guessed_format()
        .map_err(|e| decode_error(path, e))?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Read image dimensions from the file header.
pub fn identify(path: &Path) -> Result<Dimensions, ConvertError> {
    let (width, height) = ImageReader::open(path)
        .map_err(|e| decode_error(path, e))?
        .with_guessed_format()
        .map_err(|e| decode_error(path, e))?
        .into_dimensions()
        .map_err(|e| decode_error(path, e))?;
    Dimensions::new(width, height)
}

/// Check the requested format against the encoder table.
fn ensure_encoder(format: OutputFormat) -> Result<(), ConvertError> {
    if registered_output_formats().contains(&format) {
        Ok(())
    } else {
        Err(ConvertError::Encode(format!(
            "no encoder registered for {}",
            format.mime_type()
        )))
    }
}

/// Encode `img` into `writer` according to `encoding`.
fn encode<W: Write + Seek>(
    img: &DynamicImage,
    encoding: EncodingSpec,
    writer: W,
) -> Result<(), ConvertError> {
    use image::codecs::{
        avif::AvifEncoder, jpeg::JpegEncoder, png::PngEncoder, tiff::TiffEncoder,
        webp::WebPEncoder,
    };

    let quality = encoding.quality.value();
    let result = match encoding.format {
        // JPEG has no alpha channel
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(writer, quality)),
        OutputFormat::Avif => {
            img.write_with_encoder(AvifEncoder::new_with_speed_quality(writer, 6, quality))
        }
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new(writer)),
        OutputFormat::WebP => img.write_with_encoder(WebPEncoder::new_lossless(writer)),
        OutputFormat::Tiff => img.write_with_encoder(TiffEncoder::new(writer)),
    };
    result.map_err(|e| ConvertError::Encode(format!("{} encode failed: {}", encoding.format, e)))
}

/// Encode to a temp file beside `path`, then rename it into place.
///
/// The temp file is removed on drop if anything fails, so a failed encode
/// never leaves a partial file at `path`.
fn save_image(img: &DynamicImage, path: &Path, encoding: EncodingSpec) -> Result<(), ConvertError> {
    ensure_encoder(encoding.format)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".coverfit-")
        .suffix(".part")
        .tempfile_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode(img, encoding, &mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| ConvertError::Io(e.error))?;
    Ok(())
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, ConvertError> {
        identify(path)
    }

    fn convert(&self, params: &ConvertParams) -> Result<ConvertReport, ConvertError> {
        let source = load_image(&params.source)?;
        let (canvas, report) = cover_fit(&source, params.target, params.alignment)?;
        drop(source);
        log::debug!(
            "encoding {} as {} (quality {})",
            params.output.display(),
            params.encoding.format,
            params.encoding.quality.value()
        );
        save_image(&canvas, &params.output, params.encoding)?;
        Ok(report)
    }
}
