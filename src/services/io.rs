//! Image I/O operations service
//!
//! Decoding user files into rasters and encoding results back to bytes live
//! here, outside the compositor.

use crate::{
    config::{ExportConfig, OutputFormat},
    error::{BgExtendError, Result},
};
use crate::services::OutputFormatHandler;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// Tries extension-based detection first and falls back to sniffing the
    /// content, so mislabelled files still decode.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use bg_extend::services::ImageIOService;
    ///
    /// let image = ImageIOService::load_image("input.jpg")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(BgExtendError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                tracing::debug!(
                    path = %path_ref.display(),
                    error = %e,
                    "Extension-based loading failed, attempting content-based detection"
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    BgExtendError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    let extension = path_ref
                        .extension()
                        .and_then(|s| s.to_str())
                        .unwrap_or("unknown");

                    BgExtendError::processing_stage_error(
                        "image loading",
                        &format!(
                            "Failed to load image with both extension-based ({}) and content-based detection. Extension error: {}. Content error: {}",
                            extension, e, content_err
                        ),
                        Some(&format!("path: {}, size: {} bytes", path_ref.display(), data.len())),
                    )
                })
            },
        }
    }

    /// Decode an image from memory using content-based format detection
    pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| {
            BgExtendError::processing_stage_error(
                "image decoding",
                &e.to_string(),
                Some(&format!("{} bytes", bytes.len())),
            )
        })
    }

    /// Encode an RGBA raster into the bytes of the requested format
    ///
    /// JPEG drops alpha and honours `jpeg_quality`; WebP is encoded lossless;
    /// `Rgba8` returns the raw pixel buffer.
    pub fn encode(image: &RgbaImage, export: &ExportConfig) -> Result<Vec<u8>> {
        export.validate()?;

        let Some(container) = OutputFormatHandler::image_format(export.format) else {
            return Ok(image.as_raw().clone());
        };

        #[cfg(not(feature = "webp-support"))]
        if container == ImageFormat::WebP {
            return Err(BgExtendError::unsupported_format(
                "WebP output requires the webp-support feature",
            ));
        }

        let converted = OutputFormatHandler::convert_format(image.clone(), export.format);
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        if container == ImageFormat::Jpeg {
            let encoder = JpegEncoder::new_with_quality(&mut cursor, export.jpeg_quality);
            converted.write_with_encoder(encoder)?;
        } else {
            converted.write_to(&mut cursor, container)?;
        }

        Ok(buffer)
    }

    /// Save an image to a file in the requested format
    ///
    /// Parent directories are created as needed.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use bg_extend::{services::ImageIOService, ExportConfig, OutputFormat};
    /// use image::RgbaImage;
    ///
    /// let image = RgbaImage::new(100, 100);
    /// ImageIOService::save_image(&image, "output.png", &ExportConfig::new(OutputFormat::Png))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn save_image<P: AsRef<Path>>(
        image: &RgbaImage,
        path: P,
        export: &ExportConfig,
    ) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BgExtendError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        let bytes = Self::encode(image, export).map_err(|e| {
            BgExtendError::processing_stage_error(
                "image save",
                &format!("Failed to encode as {}: {}", export.format, e),
                Some(&format!("path: {}", path_ref.display())),
            )
        })?;

        std::fs::write(path_ref, &bytes)
            .map_err(|e| BgExtendError::file_io_error("write output image", path_ref, &e))?;

        tracing::debug!(
            path = %path_ref.display(),
            format = %export.format,
            bytes = bytes.len(),
            "Saved image"
        );
        Ok(())
    }
}
