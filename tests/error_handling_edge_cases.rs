//! Error handling and edge case testing
//!
//! Tests error conditions, degenerate inputs, and boundary conditions that can
//! occur during background extension.

use bg_extend::{
    compose, extend_background_from_bytes, BgExtendError, CompositionConfig,
    EdgeExtensionCompositor, ExportConfig, ExtensionMode, ImageIOService, OutputFormat,
    OutputFormatHandler, Result,
};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

#[test]
fn test_config_validation_edge_cases() -> Result<()> {
    // Smallest valid strip
    let config = CompositionConfig::builder().edge_strip_size(1).build()?;
    assert_eq!(config.edge_strip_size, 1);

    // Zero strip rejected at build time
    let error = CompositionConfig::builder()
        .edge_strip_size(0)
        .build()
        .unwrap_err();
    assert!(matches!(error, BgExtendError::InvalidConfig(_)));
    assert!(error.to_string().contains("Edge strip size"));

    // Manual construction is caught by the compositor
    let config = CompositionConfig {
        edge_strip_size: 0,
        ..CompositionConfig::default()
    };
    assert!(EdgeExtensionCompositor::new(config).is_err());

    // Blur sigma checks
    for sigma in [0.0, -2.0, f32::NAN, f32::INFINITY] {
        let result = CompositionConfig::builder().blur(true).blur_sigma(sigma).build();
        assert!(result.is_err(), "sigma {sigma} should be rejected");
    }

    Ok(())
}

#[test]
fn test_config_errors_abort_before_any_output() {
    let source = RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255]));
    let config = CompositionConfig {
        mode: ExtensionMode::Fit {
            target_width: 0,
            target_height: 10,
        },
        ..CompositionConfig::default()
    };
    let result = compose(&source, &config);
    assert!(matches!(result, Err(BgExtendError::InvalidConfig(_))));
}

#[test]
fn test_fit_target_smaller_than_source() {
    let source = RgbaImage::new(64, 64);
    let config = CompositionConfig::builder().fit(128, 32).build().unwrap();
    let error = compose(&source, &config).unwrap_err();
    assert!(matches!(error, BgExtendError::InvalidConfig(_)));
    assert!(error.to_string().contains("smaller"));
}

#[test]
fn test_degenerate_sources_are_clamped_not_rejected() -> Result<()> {
    let config = CompositionConfig::builder()
        .padding(6)
        .edge_strip_size(64)
        .build()?;

    for (w, h) in [(1, 1), (1, 9), (9, 1), (2, 3)] {
        let source = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
        let result = compose(&source, &config)?;
        assert_eq!(result.dimensions(), (w + 12, h + 12));
        assert_eq!(result.layout.strip_width, w);
        assert_eq!(result.layout.strip_height, h);
    }
    Ok(())
}

#[test]
fn test_empty_source_rejected() {
    let config = CompositionConfig::default();
    for (w, h) in [(0, 0), (0, 10), (10, 0)] {
        let result = compose(&RgbaImage::new(w, h), &config);
        assert!(matches!(result, Err(BgExtendError::InvalidInput(_))));
    }
}

#[test]
fn test_huge_padding_overflow_rejected() {
    let source = RgbaImage::new(2, 2);
    let config = CompositionConfig::builder()
        .padding(u32::MAX / 2)
        .build()
        .unwrap();
    let result = compose(&source, &config);
    assert!(matches!(result, Err(BgExtendError::InvalidConfig(_))));
}

#[test]
fn test_transparent_pixels_are_extended_as_is() -> Result<()> {
    let source = RgbaImage::from_pixel(4, 4, Rgba([50, 60, 70, 0]));
    let config = CompositionConfig::builder().padding(3).build()?;
    let result = compose(&source, &config)?;
    assert!(result.image.pixels().all(|p| p.0[3] == 0));
    Ok(())
}

#[test]
fn test_invalid_image_bytes() {
    let config = CompositionConfig::default();
    assert!(extend_background_from_bytes(&[], &config).is_err());
    assert!(extend_background_from_bytes(&[0x89, 0x50, 0x4E, 0x47], &config).is_err());
}

#[test]
fn test_output_save_formats() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let source = RgbaImage::from_fn(8, 6, |x, y| Rgba([(x * 30) as u8, (y * 40) as u8, 90, 255]));
    let result = compose(&source, &CompositionConfig::builder().padding(2).build()?)?;

    for format in [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Tiff] {
        let extension = OutputFormatHandler::get_extension(format);
        let path = temp_dir.path().join(format!("out.{}", extension));
        result.save(&path, &ExportConfig::new(format))?;
        let loaded = ImageIOService::load_image(&path)?;
        assert_eq!((loaded.width(), loaded.height()), (12, 10));
    }

    let raw_path = temp_dir.path().join("out.rgba8");
    result.save(&raw_path, &ExportConfig::new(OutputFormat::Rgba8))?;
    assert_eq!(std::fs::metadata(&raw_path)?.len(), 12 * 10 * 4);
    Ok(())
}

#[test]
fn test_save_into_unwritable_location_fails() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not a directory").unwrap();

    let source = RgbaImage::new(2, 2);
    let result = compose(&source, &CompositionConfig::default()).unwrap();
    let err = result.save_png(blocker.join("out.png"));
    assert!(err.is_err());
}
