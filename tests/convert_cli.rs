//! End-to-end tests for the library API and the `coverfit` binary.
//!
//! Run with: cargo test --test convert_cli

use coverfit::imaging::{
    Alignment, ConvertConfig, ConvertError, HorizontalAlign, OutputFormat, VerticalAlign,
    convert_file, identify,
};
use image::{Rgb, RgbImage};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Left half red, right half blue.
fn write_halves(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    img.save(path).unwrap();
}

fn coverfit() -> Command {
    Command::new(env!("CARGO_BIN_EXE_coverfit"))
}

#[test]
fn library_round_trip_has_exact_dimensions() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("wide.png");
    write_halves(&source, 400, 200);
    let output = tmp.path().join("nested/dir/square.png");

    let config = ConvertConfig::new(300, 300, Alignment::center(), OutputFormat::Png, 90).unwrap();
    convert_file(&source, &output, &config).unwrap();

    let dims = identify(&output).unwrap();
    assert_eq!((dims.width, dims.height), (300, 300));
}

#[test]
fn library_left_alignment_keeps_left_half() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("wide.png");
    write_halves(&source, 400, 100);
    let output = tmp.path().join("left.png");

    let align = Alignment::new(VerticalAlign::Middle, HorizontalAlign::Left);
    let config = ConvertConfig::new(100, 100, align, OutputFormat::Png, 90).unwrap();
    convert_file(&source, &output, &config).unwrap();

    let img = image::open(&output).unwrap().to_rgb8();
    let px = img.get_pixel(50, 50);
    assert!(px[0] > 200 && px[2] < 50, "expected red, got {:?}", px);
}

#[test]
fn library_rejects_quality_101_before_touching_disk() {
    let tmp = TempDir::new().unwrap();
    let result = ConvertConfig::new(10, 10, Alignment::center(), OutputFormat::Jpeg, 101);
    assert!(matches!(result, Err(ConvertError::Validation(_))));
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn library_missing_source_is_decode_error() {
    let tmp = TempDir::new().unwrap();
    let config = ConvertConfig::new(10, 10, Alignment::center(), OutputFormat::Png, 90).unwrap();
    let result = convert_file(
        &tmp.path().join("absent.png"),
        &tmp.path().join("out.png"),
        &config,
    );
    assert!(matches!(result, Err(ConvertError::Decode { .. })));
    assert!(!tmp.path().join("out.png").exists());
}

#[test]
fn cli_convert_writes_output_and_reports_geometry() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("in.png");
    write_halves(&source, 400, 200);
    let output = tmp.path().join("out/thumb.jpg");

    let out = coverfit()
        .arg("convert")
        .arg(&source)
        .arg(&output)
        .args(["--width", "300", "--height", "300"])
        .args(["--valign", "middle", "--halign", "middle"])
        .args(["--format", "jpeg", "--quality", "85"])
        .output()
        .unwrap();

    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("(400x200)"), "stdout: {}", stdout);
    assert!(stdout.contains("Draw: 600x300 at (-150, 0)"), "stdout: {}", stdout);
    assert_eq!(image::image_dimensions(&output).unwrap(), (300, 300));
}

#[test]
fn cli_convert_requires_every_parameter() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("in.png");
    write_halves(&source, 40, 20);

    let out = coverfit()
        .arg("convert")
        .arg(&source)
        .arg(tmp.path().join("out.png"))
        .args(["--width", "30", "--height", "30"])
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(!tmp.path().join("out.png").exists());
}

#[test]
fn cli_convert_rejects_quality_101() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("in.png");
    write_halves(&source, 40, 20);

    let out = coverfit()
        .arg("convert")
        .arg(&source)
        .arg(tmp.path().join("out.jpg"))
        .args(["--width", "30", "--height", "30"])
        .args(["--valign", "top", "--halign", "left"])
        .args(["--format", "jpeg", "--quality", "101"])
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Validation"));
    assert!(!tmp.path().join("out.jpg").exists());
}

#[test]
fn cli_identify_prints_dimensions() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("in.png");
    write_halves(&source, 64, 48);

    let out = coverfit().arg("identify").arg(&source).output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).trim_end().ends_with(": 64x48"));
}

#[test]
fn cli_gen_config_is_valid_toml() {
    let out = coverfit().arg("gen-config").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    let parsed: toml::Value = toml::from_str(&text).unwrap();
    assert!(parsed.get("output").is_some());
}

#[test]
fn cli_batch_uses_source_config() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("photos");
    write_halves(&src.join("a.png"), 200, 100);
    write_halves(&src.join("travel/b.png"), 100, 200);
    std::fs::write(
        src.join("config.toml"),
        "[output]\nwidth = 50\nheight = 40\nformat = \"png\"\n",
    )
    .unwrap();
    let out_dir = tmp.path().join("thumbs");

    let out = coverfit().arg("batch").arg(&src).arg(&out_dir).output().unwrap();

    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Converting 2 images"), "stdout: {}", stdout);
    assert!(stdout.contains("2 converted, 0 failed"), "stdout: {}", stdout);
    assert_eq!(image::image_dimensions(out_dir.join("a.png")).unwrap(), (50, 40));
    assert_eq!(
        image::image_dimensions(out_dir.join("travel/b.png")).unwrap(),
        (50, 40)
    );
}

#[test]
fn cli_batch_fails_when_an_image_is_broken() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("photos");
    write_halves(&src.join("good.png"), 20, 20);
    std::fs::write(src.join("broken.jpg"), b"not a jpeg").unwrap();
    let out_dir = tmp.path().join("out");

    let out = coverfit().arg("batch").arg(&src).arg(&out_dir).output().unwrap();

    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1 converted, 1 failed"), "stdout: {}", stdout);
    assert!(out_dir.join("good.jpg").exists());
}
