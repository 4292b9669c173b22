//! Result and metadata types for background extension

use crate::{
    config::{ExportConfig, OutputFormat},
    error::Result,
    layout::CompositionLayout,
    services::ImageIOService,
};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of one composition
#[derive(Debug, Clone)]
pub struct ExtensionResult {
    /// The fully rendered output raster
    pub image: RgbaImage,

    /// The layout that produced it
    pub layout: CompositionLayout,

    /// Processing metadata
    pub metadata: ProcessingMetadata,
}

impl ExtensionResult {
    #[must_use]
    pub fn new(image: RgbaImage, layout: CompositionLayout, metadata: ProcessingMetadata) -> Self {
        Self {
            image,
            layout,
            metadata,
        }
    }

    /// Attach the path the source was loaded from
    #[must_use]
    pub fn with_input_path<P: AsRef<Path>>(mut self, input_path: P) -> Self {
        self.metadata.input_path = Some(input_path.as_ref().display().to_string());
        self
    }

    /// Save the output as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save(path, &ExportConfig::new(OutputFormat::Png))
    }

    /// Save the output in the given format
    pub fn save<P: AsRef<Path>>(&self, path: P, export: &ExportConfig) -> Result<()> {
        ImageIOService::save_image(&self.image, path, export)
    }

    /// Save the output and record the encode time in the metadata
    pub fn save_timed<P: AsRef<Path>>(&mut self, path: P, export: &ExportConfig) -> Result<()> {
        let start = instant::Instant::now();
        self.save(path, export)?;
        self.metadata.timings.image_encode_ms = Some(start.elapsed().as_millis() as u64);
        Ok(())
    }

    /// Encode the output into the bytes of the given format
    pub fn to_bytes(&self, export: &ExportConfig) -> Result<Vec<u8>> {
        ImageIOService::encode(&self.image, export)
    }

    /// Raw RGBA8 pixel data
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.image.as_raw().clone()
    }

    /// Consume the result and return the raster as a `DynamicImage`
    #[must_use]
    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.image)
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }

    /// One-line summary of where the time went
    #[must_use]
    pub fn timing_summary(&self) -> String {
        let t = &self.metadata.timings;
        let mut summary = format!(
            "Total: {}ms (plan: {}ms, scale: {}ms, draw: {}ms",
            t.total_ms, t.planning_ms, t.scaling_ms, t.drawing_ms
        );
        if let Some(decode) = t.image_decode_ms {
            summary.push_str(&format!(", decode: {}ms", decode));
        }
        if let Some(encode) = t.image_encode_ms {
            summary.push_str(&format!(", encode: {}ms", encode));
        }
        summary.push(')');
        summary
    }
}

/// Timing breakdown of a composition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Image decoding, when the convenience API decoded the input
    pub image_decode_ms: Option<u64>,

    /// Layout planning and validation
    pub planning_ms: u64,

    /// Resampling the source for fit mode
    pub scaling_ms: u64,

    /// Drawing the nine regions
    pub drawing_ms: u64,

    /// Final image encoding, when saved with timing
    pub image_encode_ms: Option<u64>,

    /// Total composition time
    pub total_ms: u64,
}

/// Metadata about one composition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Source dimensions
    pub input_dimensions: (u32, u32),

    /// Output dimensions
    pub output_dimensions: (u32, u32),

    /// Whether the center draw was blurred
    pub blurred: bool,

    /// Path of the source, when known
    pub input_path: Option<String>,

    pub timings: ProcessingTimings,
}
