//! CLI integration tests
//!
//! Runs the built binary against real images in a temporary directory and
//! checks output naming, dimensions, and exit status.

use image::{Rgba, RgbaImage};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bg-extend"))
}

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([120, 80, 40, 255]))
        .save(path)
        .expect("Failed to write test image");
}

#[test]
fn test_cli_single_file_padding_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("photo.png");
    write_png(&input, 20, 10);

    let output = bin()
        .arg(&input)
        .args(["--padding", "5", "--edge-size", "3"])
        .output()
        .expect("Failed to run CLI");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let result = image::open(temp_dir.path().join("photo_extended.png")).unwrap();
    assert_eq!((result.width(), result.height()), (30, 20));
}

#[test]
fn test_cli_fit_mode_explicit_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("square.png");
    let out = temp_dir.path().join("wide.jpg");
    write_png(&input, 16, 16);

    let status = bin()
        .arg(&input)
        .args(["--width", "48", "--height", "16", "-f", "jpeg", "-o"])
        .arg(&out)
        .status()
        .expect("Failed to run CLI");
    assert!(status.success());

    let result = image::open(&out).unwrap();
    assert_eq!((result.width(), result.height()), (48, 16));
}

#[test]
fn test_cli_batch_directory_into_output_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input_dir = temp_dir.path().join("in");
    let nested = input_dir.join("nested");
    std::fs::create_dir_all(&nested).unwrap();
    write_png(&input_dir.join("b.png"), 4, 4);
    write_png(&input_dir.join("a.png"), 6, 2);
    write_png(&nested.join("c.png"), 3, 3);
    std::fs::write(input_dir.join("readme.txt"), "not an image").unwrap();

    let out_dir = temp_dir.path().join("out");
    let status = bin()
        .arg(&input_dir)
        .args(["--recursive", "--padding", "1", "-o"])
        .arg(&out_dir)
        .status()
        .expect("Failed to run CLI");
    assert!(status.success());

    let a = image::open(out_dir.join("a_extended.png")).unwrap();
    assert_eq!((a.width(), a.height()), (8, 4));
    assert!(out_dir.join("b_extended.png").exists());
    assert!(out_dir.join("nested").join("c_extended.png").exists());
    assert!(!out_dir.join("readme_extended.png").exists());
}

#[test]
fn test_cli_rejects_zero_edge_size() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("photo.png");
    write_png(&input, 8, 8);

    let status = bin()
        .arg(&input)
        .args(["--edge-size", "0"])
        .status()
        .expect("Failed to run CLI");
    assert!(!status.success());
    assert!(!temp_dir.path().join("photo_extended.png").exists());
}

#[test]
fn test_cli_batch_reports_failures() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write_png(&temp_dir.path().join("good.png"), 4, 4);
    std::fs::write(temp_dir.path().join("broken.png"), [0x89, 0x50, 0x4E, 0x47]).unwrap();

    let out_dir = temp_dir.path().join("out");
    let status = bin()
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&out_dir)
        .status()
        .expect("Failed to run CLI");

    assert!(!status.success());
    assert!(out_dir.join("good_extended.png").exists());
}

#[test]
fn test_cli_stdin_to_stdout() {
    use std::io::Write;
    use std::process::Stdio;

    let mut png = Vec::new();
    RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 255]))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let mut child = bin()
        .args(["-", "--padding", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn CLI");
    child.stdin.take().unwrap().write_all(&png).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let result = image::load_from_memory(&output.stdout).unwrap();
    assert_eq!((result.width(), result.height()), (9, 9));
}

#[test]
fn test_cli_infers_format_from_output_extension() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("photo.png");
    let out = temp_dir.path().join("photo_out.tiff");
    write_png(&input, 6, 4);

    let status = bin()
        .arg(&input)
        .args(["--padding", "2", "-o"])
        .arg(&out)
        .status()
        .expect("Failed to run CLI");
    assert!(status.success());

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Tiff
    );
    let result = image::load_from_memory(&bytes).unwrap();
    assert_eq!((result.width(), result.height()), (10, 8));
}
