#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Background Extension Library
//!
//! Extends the background of a raster image by repeating its own edges. The
//! source is placed on a larger canvas and the margin is filled with strips
//! sampled from the source's edges and corners, stretched to the margin's
//! thickness, which gives a seamless extended background instead of blank
//! padding.
//!
//! ## Features
//!
//! - **Padding mode**: uniform margin on all four sides
//! - **Fit mode**: scale to a target size with a different aspect ratio and
//!   extend whatever margin remains
//! - **Center blur**: optionally blur the original image, never the border
//! - **Format Support**: PNG, JPEG, WebP, TIFF, and raw RGBA8 output
//! - **CLI Integration**: optional command-line interface (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bg_extend::{extend_background_from_bytes, CompositionConfig, ExportConfig, OutputFormat};
//!
//! # fn example(upload: Vec<u8>) -> anyhow::Result<()> {
//! let config = CompositionConfig::builder()
//!     .fit(1920, 1080)
//!     .edge_strip_size(8)
//!     .build()?;
//!
//! let result = extend_background_from_bytes(&upload, &config)?;
//! let jpeg = result.to_bytes(&ExportConfig::new(OutputFormat::Jpeg).with_jpeg_quality(85))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI Usage
//!
//! ```toml
//! [dependencies]
//! bg-extend = { version = "0.1", default-features = false }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod compositor;
pub mod config;
pub mod error;
pub mod layout;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod utils;

use tokio::io::AsyncRead;

pub use compositor::{compose, EdgeExtensionCompositor};
pub use config::{
    CompositionConfig, CompositionConfigBuilder, ExportConfig, ExtensionMode, OutputFormat,
    ResampleFilter,
};
pub use error::{BgExtendError, Result};
pub use layout::{
    CompositionLayout, LayoutKind, Margins, Rect, RegionCopy, RegionKind, ASPECT_RATIO_TOLERANCE,
};
pub use services::{ImageIOService, OutputFormatHandler};
pub use types::{ExtensionResult, ProcessingMetadata, ProcessingTimings};
pub use utils::NumericValidator;

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Extend the background of a `DynamicImage`
///
/// Any pixel layout is accepted and converted to RGBA8 first.
///
/// # Examples
/// ```rust
/// use bg_extend::{extend_background_from_image, CompositionConfig};
/// use image::DynamicImage;
///
/// let img = DynamicImage::new_rgb8(64, 48);
/// let config = CompositionConfig::builder().padding(8).build()?;
/// let result = extend_background_from_image(&img, &config)?;
/// assert_eq!(result.dimensions(), (80, 64));
/// # Ok::<(), bg_extend::BgExtendError>(())
/// ```
pub fn extend_background_from_image(
    image: &image::DynamicImage,
    config: &CompositionConfig,
) -> Result<ExtensionResult> {
    let compositor = EdgeExtensionCompositor::new(*config)?;
    match image.as_rgba8() {
        Some(rgba) => compositor.compose(rgba),
        None => compositor.compose(&image.to_rgba8()),
    }
}

/// Extend the background of an encoded image (JPEG, PNG, WebP, BMP, TIFF)
pub fn extend_background_from_bytes(
    image_bytes: &[u8],
    config: &CompositionConfig,
) -> Result<ExtensionResult> {
    config.validate()?;

    let decode_start = instant::Instant::now();
    let image = ImageIOService::load_from_bytes(image_bytes)?;
    let decode_ms = decode_start.elapsed().as_millis() as u64;

    let mut result = extend_background_from_image(&image, config)?;
    result.metadata.timings.image_decode_ms = Some(decode_ms);
    Ok(result)
}

/// Extend the background of an image read from an async stream
///
/// The stream is read to the end before decoding; composition itself is
/// synchronous.
///
/// # Examples
/// ```rust,no_run
/// use bg_extend::{extend_background_from_reader, CompositionConfig};
/// use tokio::fs::File;
///
/// # async fn example() -> anyhow::Result<()> {
/// let file = File::open("photo.jpg").await?;
/// let result = extend_background_from_reader(file, &CompositionConfig::default()).await?;
/// result.save_png("photo_extended.png")?;
/// # Ok(())
/// # }
/// ```
pub async fn extend_background_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &CompositionConfig,
) -> Result<ExtensionResult> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer)
        .await
        .map_err(|e| BgExtendError::processing(format!("Failed to read from stream: {}", e)))?;

    extend_background_from_bytes(&buffer, config)
}
