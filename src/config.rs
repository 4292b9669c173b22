//! Configuration types for background extension operations

use crate::error::{BgExtendError, Result};
use crate::utils::NumericValidator;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default uniform margin in padding mode
pub const DEFAULT_PADDING: u32 = 50;

/// Default thickness of the sampled edge strip
pub const DEFAULT_EDGE_STRIP_SIZE: u32 = 10;

/// Default gaussian sigma for the center blur
pub const DEFAULT_BLUR_SIGMA: f32 = 4.0;

/// How the output canvas is sized around the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExtensionMode {
    /// Uniform margin of `padding` pixels on all four sides
    Padding { padding: u32 },
    /// Scale the source to fit `target_width × target_height` and extend
    /// whatever margin the aspect ratio difference leaves
    Fit {
        target_width: u32,
        target_height: u32,
    },
}

impl Default for ExtensionMode {
    fn default() -> Self {
        Self::Padding {
            padding: DEFAULT_PADDING,
        }
    }
}

impl std::fmt::Display for ExtensionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Padding { padding } => write!(f, "padding({}px)", padding),
            Self::Fit {
                target_width,
                target_height,
            } => write!(f, "fit({}x{})", target_width, target_height),
        }
    }
}

/// Resampling filter used when stretching strips and scaling content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Nearest neighbour, exact for uniform strips
    Nearest,
    /// Linear (bilinear) filter
    #[default]
    Triangle,
    /// Cubic (Catmull-Rom) filter
    CatmullRom,
    /// Gaussian filter
    Gaussian,
    /// Lanczos with window 3
    Lanczos3,
}

impl ResampleFilter {
    /// Map to the `image` crate's filter type
    #[must_use]
    pub fn to_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// PNG with alpha channel
    #[default]
    Png,
    /// JPEG (no transparency, alpha is dropped)
    Jpeg,
    /// Lossless WebP with alpha channel
    WebP,
    /// TIFF with alpha channel
    Tiff,
    /// Raw RGBA8 pixel data (4 bytes per pixel)
    Rgba8,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
            Self::WebP => write!(f, "WebP"),
            Self::Tiff => write!(f, "TIFF"),
            Self::Rgba8 => write!(f, "RGBA8"),
        }
    }
}

/// Encoding options applied when a result leaves memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format
    pub format: OutputFormat,

    /// JPEG quality (0-100, only used for JPEG output)
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            jpeg_quality: 90,
        }
    }
}

impl ExportConfig {
    /// Create an export configuration for a format with default quality
    #[must_use]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Set JPEG quality (clamped to 100)
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.min(100);
        self
    }

    /// Validate quality range
    pub fn validate(&self) -> Result<()> {
        NumericValidator::validate_quality(self.jpeg_quality, "JPEG quality", 90)?;
        Ok(())
    }
}

/// Configuration for one composition
///
/// Constructed per invocation. Validation of source-independent rules happens
/// here; rules that depend on the source size (output overflow, fit targets
/// smaller than the source) are checked by the layout planner before any
/// pixel is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Padding or fit-to-target sizing
    pub mode: ExtensionMode,

    /// Thickness of the sampled edge strip, clamped per axis to the source size
    pub edge_strip_size: u32,

    /// Blur the center draw (never the extended border)
    pub blur: bool,

    /// Gaussian sigma used when `blur` is enabled
    pub blur_sigma: f32,

    /// Resampling filter for strips and content scaling
    pub filter: ResampleFilter,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            mode: ExtensionMode::default(),
            edge_strip_size: DEFAULT_EDGE_STRIP_SIZE,
            blur: false,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            filter: ResampleFilter::default(),
        }
    }
}

impl CompositionConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bg_extend::{CompositionConfig, ResampleFilter};
    ///
    /// let config = CompositionConfig::builder()
    ///     .padding(32)
    ///     .edge_strip_size(4)
    ///     .filter(ResampleFilter::Nearest)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.edge_strip_size, 4);
    /// ```
    #[must_use]
    pub fn builder() -> CompositionConfigBuilder {
        CompositionConfigBuilder::default()
    }

    /// Validate all source-independent parameters
    ///
    /// # Errors
    /// - Edge strip size of zero
    /// - Fit target with a zero dimension
    /// - Non-finite or non-positive blur sigma while blur is enabled
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bg_extend::CompositionConfig;
    ///
    /// let mut config = CompositionConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.edge_strip_size = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        NumericValidator::validate_positive(self.edge_strip_size, "Edge strip size")?;

        if let ExtensionMode::Fit {
            target_width,
            target_height,
        } = self.mode
        {
            NumericValidator::validate_positive(target_width, "Target width")?;
            NumericValidator::validate_positive(target_height, "Target height")?;
        }

        if self.blur {
            NumericValidator::validate_positive_finite(self.blur_sigma, "Blur sigma")?;
        }

        Ok(())
    }

    /// Parse and validate a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            BgExtendError::invalid_config(format!("Failed to parse configuration: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .map_err(|e| BgExtendError::file_io_error("read configuration file", path_ref, &e))?;
        Self::from_json_str(&content)
    }
}

/// Builder for `CompositionConfig`
#[derive(Debug, Default)]
pub struct CompositionConfigBuilder {
    config: CompositionConfig,
}

impl CompositionConfigBuilder {
    /// Use padding mode with a uniform margin
    #[must_use]
    pub fn padding(mut self, padding: u32) -> Self {
        self.config.mode = ExtensionMode::Padding { padding };
        self
    }

    /// Use fit mode with an explicit target size
    #[must_use]
    pub fn fit(mut self, target_width: u32, target_height: u32) -> Self {
        self.config.mode = ExtensionMode::Fit {
            target_width,
            target_height,
        };
        self
    }

    /// Set the sizing mode directly
    #[must_use]
    pub fn mode(mut self, mode: ExtensionMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set edge strip thickness
    #[must_use]
    pub fn edge_strip_size(mut self, size: u32) -> Self {
        self.config.edge_strip_size = size;
        self
    }

    /// Enable or disable the center blur
    #[must_use]
    pub fn blur(mut self, blur: bool) -> Self {
        self.config.blur = blur;
        self
    }

    /// Set the center blur sigma
    #[must_use]
    pub fn blur_sigma(mut self, sigma: f32) -> Self {
        self.config.blur_sigma = sigma;
        self
    }

    /// Set the resampling filter
    #[must_use]
    pub fn filter(mut self, filter: ResampleFilter) -> Self {
        self.config.filter = filter;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<CompositionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
