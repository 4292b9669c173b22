//! Edge-extension compositor
//!
//! Places the source on a larger canvas and fills the margin by stretching
//! strips sampled from the source's own edges and corners. The draw order is
//! fixed: four edge bands, four corner blocks, then the center. The center is
//! last so original pixels are never altered by the extension pass.

use crate::{
    config::{CompositionConfig, ResampleFilter},
    error::Result,
    layout::{CompositionLayout, LayoutKind, Rect, RegionCopy, RegionKind},
    types::{ExtensionResult, ProcessingMetadata, ProcessingTimings},
};
use image::imageops;
use image::RgbaImage;
use instant::Instant;
use std::borrow::Cow;
use tracing::{debug, debug_span, trace};

/// Background extension by edge repetition
///
/// Holds a validated [`CompositionConfig`]; every call to
/// [`compose`](Self::compose) produces a fresh output and keeps no state.
///
/// # Examples
///
/// ```rust
/// use bg_extend::{CompositionConfig, EdgeExtensionCompositor};
/// use image::{Rgba, RgbaImage};
///
/// let source = RgbaImage::from_pixel(40, 30, Rgba([200, 100, 50, 255]));
/// let config = CompositionConfig::builder().padding(10).edge_strip_size(4).build()?;
/// let compositor = EdgeExtensionCompositor::new(config)?;
///
/// let result = compositor.compose(&source)?;
/// assert_eq!(result.dimensions(), (60, 50));
/// # Ok::<(), bg_extend::BgExtendError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EdgeExtensionCompositor {
    config: CompositionConfig,
}

impl EdgeExtensionCompositor {
    /// Create a compositor, validating the configuration up front
    pub fn new(config: CompositionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Plan the layout for a source of the given size without drawing
    pub fn plan(&self, source_width: u32, source_height: u32) -> Result<CompositionLayout> {
        CompositionLayout::plan(source_width, source_height, &self.config)
    }

    /// Compose the extended output for `source`
    ///
    /// Validation happens before any drawing; on error no output is produced.
    pub fn compose(&self, source: &RgbaImage) -> Result<ExtensionResult> {
        let total_start = Instant::now();
        let span = debug_span!(
            "compose",
            source_width = source.width(),
            source_height = source.height(),
            mode = %self.config.mode
        );
        let _enter = span.enter();

        let layout = self.plan(source.width(), source.height())?;
        let planning_ms = total_start.elapsed().as_millis() as u64;
        debug!(
            kind = ?layout.kind,
            output_width = layout.width,
            output_height = layout.height,
            x_offset = layout.x_offset(),
            y_offset = layout.y_offset(),
            strip_width = layout.strip_width,
            strip_height = layout.strip_height,
            scale = layout.scale,
            "Planned composition"
        );

        let scale_start = Instant::now();
        let content: Cow<'_, RgbaImage> = if layout.requires_scaling() {
            Cow::Owned(resample(
                source,
                layout.content.width,
                layout.content.height,
                self.config.filter,
            ))
        } else {
            Cow::Borrowed(source)
        };
        let scaling_ms = scale_start.elapsed().as_millis() as u64;

        let draw_start = Instant::now();
        let mut output = RgbaImage::new(layout.width, layout.height);
        for region in layout.regions() {
            trace!(
                region = ?region.kind,
                source = ?region.source,
                destination = ?region.destination,
                "Drawing region"
            );
            if region.kind == RegionKind::Center {
                self.draw_center(&mut output, &content, region.destination);
            } else {
                draw_stretched(&mut output, &content, &region, self.config.filter);
            }
        }
        let drawing_ms = draw_start.elapsed().as_millis() as u64;

        let timings = ProcessingTimings {
            planning_ms,
            scaling_ms,
            drawing_ms,
            total_ms: total_start.elapsed().as_millis() as u64,
            ..ProcessingTimings::default()
        };
        let metadata = ProcessingMetadata {
            input_dimensions: source.dimensions(),
            output_dimensions: output.dimensions(),
            blurred: self.config.blur,
            input_path: None,
            timings,
        };

        if layout.kind == LayoutKind::UniformScale {
            debug!("Aspect ratios match, scaled without extension bands");
        }

        Ok(ExtensionResult::new(output, layout, metadata))
    }

    fn draw_center(&self, output: &mut RgbaImage, content: &RgbaImage, destination: Rect) {
        let (x, y) = (i64::from(destination.x), i64::from(destination.y));
        if self.config.blur {
            let blurred = imageops::blur(content, self.config.blur_sigma);
            imageops::replace(output, &blurred, x, y);
        } else {
            imageops::replace(output, content, x, y);
        }
    }
}

/// Sample `region.source` from the content and stretch it over
/// `region.destination`
fn draw_stretched(
    output: &mut RgbaImage,
    content: &RgbaImage,
    region: &RegionCopy,
    filter: ResampleFilter,
) {
    let src = region.source;
    let dst = region.destination;
    let sample = imageops::crop_imm(content, src.x, src.y, src.width, src.height).to_image();
    let sample = resample(&sample, dst.width, dst.height, filter);
    imageops::replace(output, &sample, i64::from(dst.x), i64::from(dst.y));
}

/// Resize `image` to `width × height`
///
/// Nearest is done by direct index mapping so hard-edged strips are copied
/// bit-exactly; other filters go through `imageops::resize`.
fn resample(image: &RgbaImage, width: u32, height: u32, filter: ResampleFilter) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    match filter {
        ResampleFilter::Nearest => {
            let (src_width, src_height) = image.dimensions();
            RgbaImage::from_fn(width, height, |x, y| {
                let sx = (u64::from(x) * u64::from(src_width) / u64::from(width)) as u32;
                let sy = (u64::from(y) * u64::from(src_height) / u64::from(height)) as u32;
                *image.get_pixel(sx, sy)
            })
        },
        other => imageops::resize(image, width, height, other.to_filter_type()),
    }
}

/// Compose `source` with `config` in one call
///
/// Equivalent to building an [`EdgeExtensionCompositor`] and calling
/// [`EdgeExtensionCompositor::compose`].
pub fn compose(source: &RgbaImage, config: &CompositionConfig) -> Result<ExtensionResult> {
    EdgeExtensionCompositor::new(*config)?.compose(source)
}
