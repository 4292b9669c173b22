//! Output format handling service
//!
//! Keeps format conversion and naming rules out of the compositor.

use crate::config::OutputFormat;
use image::{DynamicImage, ImageFormat, RgbaImage};

/// Service for handling output format conversions
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Convert an RGBA image into the pixel layout the output format stores
    ///
    /// JPEG has no alpha channel, so alpha is dropped; every other format
    /// keeps RGBA.
    ///
    /// # Examples
    /// ```rust
    /// use bg_extend::{services::OutputFormatHandler, OutputFormat};
    /// use image::{DynamicImage, RgbaImage};
    ///
    /// let converted = OutputFormatHandler::convert_format(RgbaImage::new(4, 4), OutputFormat::Jpeg);
    /// assert!(matches!(converted, DynamicImage::ImageRgb8(_)));
    /// ```
    #[must_use]
    pub fn convert_format(rgba_image: RgbaImage, format: OutputFormat) -> DynamicImage {
        match format {
            OutputFormat::Png | OutputFormat::WebP | OutputFormat::Tiff | OutputFormat::Rgba8 => {
                DynamicImage::ImageRgba8(rgba_image)
            },
            OutputFormat::Jpeg => DynamicImage::ImageRgba8(rgba_image).to_rgb8().into(),
        }
    }

    /// File extension (without the dot) for a format
    #[must_use]
    pub fn get_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Rgba8 => "rgba8",
        }
    }

    /// Guess an output format from a file extension, case-insensitively
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<OutputFormat> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "webp" => Some(OutputFormat::WebP),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            "rgba8" | "raw" => Some(OutputFormat::Rgba8),
            _ => None,
        }
    }

    /// The `image` crate container for a format, `None` for raw pixel output
    #[must_use]
    pub fn image_format(format: OutputFormat) -> Option<ImageFormat> {
        match format {
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
            OutputFormat::WebP => Some(ImageFormat::WebP),
            OutputFormat::Tiff => Some(ImageFormat::Tiff),
            OutputFormat::Rgba8 => None,
        }
    }

    /// Check if a format keeps the alpha channel
    #[must_use]
    pub fn supports_transparency(format: OutputFormat) -> bool {
        !matches!(format, OutputFormat::Jpeg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_convert_format_keeps_alpha() {
        let rgba_image = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 128]));
        let converted = OutputFormatHandler::convert_format(rgba_image, OutputFormat::Png);
        assert_eq!(converted.to_rgba8().get_pixel(0, 0), &Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn test_convert_format_jpeg_drops_alpha() {
        let rgba_image = RgbaImage::from_pixel(2, 3, Rgba([10, 20, 30, 0]));
        let converted = OutputFormatHandler::convert_format(rgba_image, OutputFormat::Jpeg);
        assert_eq!((converted.width(), converted.height()), (2, 3));
        match converted {
            DynamicImage::ImageRgb8(rgb) => assert_eq!(rgb.get_pixel(1, 1).0, [10, 20, 30]),
            _ => panic!("Expected RGB8 image for JPEG format"),
        }
    }

    #[test]
    fn test_extensions_round_trip() {
        for format in [
            OutputFormat::Png,
            OutputFormat::Jpeg,
            OutputFormat::WebP,
            OutputFormat::Tiff,
            OutputFormat::Rgba8,
        ] {
            let ext = OutputFormatHandler::get_extension(format);
            assert_eq!(OutputFormatHandler::from_extension(ext), Some(format));
        }
        assert_eq!(
            OutputFormatHandler::from_extension("JPEG"),
            Some(OutputFormat::Jpeg)
        );
        assert_eq!(OutputFormatHandler::from_extension("gif"), None);
    }

    #[test]
    fn test_supports_transparency() {
        assert!(OutputFormatHandler::supports_transparency(OutputFormat::Png));
        assert!(OutputFormatHandler::supports_transparency(OutputFormat::WebP));
        assert!(!OutputFormatHandler::supports_transparency(OutputFormat::Jpeg));
    }

    #[test]
    fn test_raw_output_has_no_container() {
        assert_eq!(OutputFormatHandler::image_format(OutputFormat::Rgba8), None);
        assert_eq!(
            OutputFormatHandler::image_format(OutputFormat::Tiff),
            Some(ImageFormat::Tiff)
        );
    }
}
