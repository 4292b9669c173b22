//! Layout planning for background extension
//!
//! A [`CompositionLayout`] is computed from the source dimensions and a
//! [`CompositionConfig`] before any pixel is touched. It fixes the output size,
//! where the (possibly scaled) source lands, the effective strip sizes, and the
//! ordered list of region copies the compositor executes.

use crate::config::{CompositionConfig, ExtensionMode};
use crate::error::{BgExtendError, Result};
use crate::utils::NumericValidator;
use serde::{Deserialize, Serialize};

/// Aspect ratios closer than this are treated as equal in fit mode
pub const ASPECT_RATIO_TOLERANCE: f64 = 0.01;

/// Axis-aligned rectangle in integer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle covers no pixels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge
    #[must_use]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    #[must_use]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Thickness of the four extension bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margins {
    #[must_use]
    pub fn uniform(margin: u32) -> Self {
        Self {
            left: margin,
            top: margin,
            right: margin,
            bottom: margin,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }
}

/// Which strategy produced the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Uniform margin around the unscaled source
    PaddingExtension,
    /// Scaled source centered on a target with a different aspect ratio
    FitExtension,
    /// Same aspect ratio: plain scale to the target, no bands
    UniformScale,
}

/// One of the nine regions of an extended canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    TopEdge,
    BottomEdge,
    LeftEdge,
    RightEdge,
    TopLeftCorner,
    TopRightCorner,
    BottomLeftCorner,
    BottomRightCorner,
    Center,
}

impl RegionKind {
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeftCorner
                | Self::TopRightCorner
                | Self::BottomLeftCorner
                | Self::BottomRightCorner
        )
    }
}

/// A rectangular copy from the content raster into the output
///
/// `source` is in content-raster coordinates (the source after scaling);
/// `destination` is in output coordinates. The sample is stretched when the
/// two sizes differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCopy {
    pub kind: RegionKind,
    pub source: Rect,
    pub destination: Rect,
}

impl RegionCopy {
    fn new(kind: RegionKind, source: Rect, destination: Rect) -> Self {
        Self {
            kind,
            source,
            destination,
        }
    }
}

/// Output size and content placement, before strip clamping
struct Placement {
    kind: LayoutKind,
    scale: f64,
    content: Rect,
    margins: Margins,
    width: u32,
    height: u32,
}

/// The complete plan behind one composition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositionLayout {
    pub kind: LayoutKind,
    /// Uniform scale applied to the source before drawing
    pub scale: f64,
    /// Original source dimensions
    pub source_width: u32,
    pub source_height: u32,
    /// Placement of the scaled source in the output
    pub content: Rect,
    pub margins: Margins,
    /// Effective edge strip thickness, clamped to the content size per axis
    pub strip_width: u32,
    pub strip_height: u32,
    /// Output dimensions
    pub width: u32,
    pub height: u32,
}

impl CompositionLayout {
    /// Plan a composition for a `source_width × source_height` raster
    ///
    /// # Errors
    /// - `InvalidInput` for a source with a zero dimension
    /// - `InvalidConfig` for any configuration error, an output size that
    ///   overflows, or a fit target smaller than the source
    pub fn plan(source_width: u32, source_height: u32, config: &CompositionConfig) -> Result<Self> {
        if source_width == 0 || source_height == 0 {
            return Err(BgExtendError::invalid_input(format!(
                "Source image must be non-empty, got {}x{}",
                source_width, source_height
            )));
        }
        config.validate()?;

        let placement = match config.mode {
            ExtensionMode::Padding { padding } => Placement {
                kind: LayoutKind::PaddingExtension,
                scale: 1.0,
                content: Rect::new(padding, padding, source_width, source_height),
                margins: Margins::uniform(padding),
                width: NumericValidator::padded_extent(source_width, padding, "width")?,
                height: NumericValidator::padded_extent(source_height, padding, "height")?,
            },
            ExtensionMode::Fit {
                target_width,
                target_height,
            } => {
                if target_width < source_width || target_height < source_height {
                    return Err(BgExtendError::invalid_config(format!(
                        "Fit target {}x{} is smaller than the {}x{} source; output must not downsample",
                        target_width, target_height, source_width, source_height
                    )));
                }
                Self::plan_fit(source_width, source_height, target_width, target_height)?
            },
        };

        NumericValidator::validate_positive(placement.width, "Output width")?;
        NumericValidator::validate_positive(placement.height, "Output height")?;

        Ok(Self {
            kind: placement.kind,
            scale: placement.scale,
            source_width,
            source_height,
            content: placement.content,
            margins: placement.margins,
            strip_width: config.edge_strip_size.min(placement.content.width),
            strip_height: config.edge_strip_size.min(placement.content.height),
            width: placement.width,
            height: placement.height,
        })
    }

    fn plan_fit(
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> Result<Placement> {
        let (sw, sh) = (f64::from(source_width), f64::from(source_height));
        let (tw, th) = (f64::from(target_width), f64::from(target_height));
        let scale = (tw / sw).min(th / sh);

        if ((sw / sh) - (tw / th)).abs() <= ASPECT_RATIO_TOLERANCE {
            return Ok(Placement {
                kind: LayoutKind::UniformScale,
                scale,
                content: Rect::new(0, 0, target_width, target_height),
                margins: Margins::default(),
                width: target_width,
                height: target_height,
            });
        }

        let scaled_width = NumericValidator::validate_f64_to_u32((sw * scale).round())?
            .clamp(1, target_width);
        let scaled_height = NumericValidator::validate_f64_to_u32((sh * scale).round())?
            .clamp(1, target_height);

        let left = (target_width - scaled_width) / 2;
        let top = (target_height - scaled_height) / 2;
        let margins = Margins {
            left,
            top,
            right: target_width - scaled_width - left,
            bottom: target_height - scaled_height - top,
        };

        Ok(Placement {
            kind: LayoutKind::FitExtension,
            scale,
            content: Rect::new(left, top, scaled_width, scaled_height),
            margins,
            width: target_width,
            height: target_height,
        })
    }

    /// Horizontal offset of the content in the output
    #[must_use]
    pub fn x_offset(&self) -> u32 {
        self.content.x
    }

    /// Vertical offset of the content in the output
    #[must_use]
    pub fn y_offset(&self) -> u32 {
        self.content.y
    }

    /// True when the source must be resampled before drawing
    #[must_use]
    pub fn requires_scaling(&self) -> bool {
        self.content.width != self.source_width || self.content.height != self.source_height
    }

    /// Region copies in draw order: four edges, four corners, then the center
    ///
    /// Regions whose destination is empty are omitted. Corners always sample
    /// a corner-sized block so no corner mixes two edge strips.
    #[must_use]
    pub fn regions(&self) -> Vec<RegionCopy> {
        let Rect {
            x: cx,
            y: cy,
            width: cw,
            height: ch,
        } = self.content;
        let (sw, sh) = (self.strip_width, self.strip_height);
        let m = self.margins;
        let right_x = cx + cw;
        let bottom_y = cy + ch;
        let far_x = cw - sw;
        let far_y = ch - sh;

        [
            RegionCopy::new(
                RegionKind::TopEdge,
                Rect::new(0, 0, cw, sh),
                Rect::new(cx, 0, cw, m.top),
            ),
            RegionCopy::new(
                RegionKind::BottomEdge,
                Rect::new(0, far_y, cw, sh),
                Rect::new(cx, bottom_y, cw, m.bottom),
            ),
            RegionCopy::new(
                RegionKind::LeftEdge,
                Rect::new(0, 0, sw, ch),
                Rect::new(0, cy, m.left, ch),
            ),
            RegionCopy::new(
                RegionKind::RightEdge,
                Rect::new(far_x, 0, sw, ch),
                Rect::new(right_x, cy, m.right, ch),
            ),
            RegionCopy::new(
                RegionKind::TopLeftCorner,
                Rect::new(0, 0, sw, sh),
                Rect::new(0, 0, m.left, m.top),
            ),
            RegionCopy::new(
                RegionKind::TopRightCorner,
                Rect::new(far_x, 0, sw, sh),
                Rect::new(right_x, 0, m.right, m.top),
            ),
            RegionCopy::new(
                RegionKind::BottomLeftCorner,
                Rect::new(0, far_y, sw, sh),
                Rect::new(0, bottom_y, m.left, m.bottom),
            ),
            RegionCopy::new(
                RegionKind::BottomRightCorner,
                Rect::new(far_x, far_y, sw, sh),
                Rect::new(right_x, bottom_y, m.right, m.bottom),
            ),
            RegionCopy::new(RegionKind::Center, Rect::new(0, 0, cw, ch), self.content),
        ]
        .into_iter()
        .filter(|region| !region.destination.is_empty())
        .collect()
    }
}
