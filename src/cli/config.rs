//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliFilter};
use crate::config::{
    CompositionConfig, ExportConfig, ExtensionMode, OutputFormat, ResampleFilter, DEFAULT_PADDING,
};
use crate::services::OutputFormatHandler;
use anyhow::{Context, Result};
use std::path::Path;

/// Convert CLI arguments to library configuration
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build the composition and export configuration from CLI arguments
    ///
    /// A `--config` file replaces every composition flag; export flags still
    /// apply.
    pub(crate) fn from_cli(cli: &Cli) -> Result<(CompositionConfig, ExportConfig)> {
        let export =
            ExportConfig::new(Self::output_format(cli)).with_jpeg_quality(cli.jpeg_quality);

        if let Some(path) = &cli.config {
            let composition = CompositionConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Loaded composition config file");
            return Ok((composition, export));
        }

        let mode = match (cli.width, cli.height) {
            (Some(target_width), Some(target_height)) => ExtensionMode::Fit {
                target_width,
                target_height,
            },
            _ => ExtensionMode::Padding {
                padding: cli.padding.unwrap_or(DEFAULT_PADDING),
            },
        };

        let composition = CompositionConfig::builder()
            .mode(mode)
            .edge_strip_size(cli.edge_size)
            .blur(cli.blur)
            .blur_sigma(cli.blur_sigma)
            .filter(Self::filter(cli.filter))
            .build()
            .context("Invalid composition configuration")?;

        Ok((composition, export))
    }

    /// Validate argument combinations clap cannot express
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.jpeg_quality > 100 {
            anyhow::bail!("JPEG quality must be between 0 and 100, got {}", cli.jpeg_quality);
        }

        if cli.edge_size == 0 {
            anyhow::bail!("Edge size must be at least 1 pixel");
        }

        if cli.input.len() > 1 && cli.input.iter().any(|i| i == "-") {
            anyhow::bail!("stdin (-) cannot be combined with other inputs");
        }

        Ok(())
    }

    /// Explicit `--format`, else the extension of a file `--output`, else PNG
    fn output_format(cli: &Cli) -> OutputFormat {
        if let Some(format) = cli.format {
            return format.into();
        }
        cli.output
            .as_deref()
            .filter(|output| *output != "-")
            .and_then(|output| Path::new(output).extension())
            .and_then(|ext| ext.to_str())
            .and_then(OutputFormatHandler::from_extension)
            .unwrap_or_default()
    }

    fn filter(filter: CliFilter) -> ResampleFilter {
        match filter {
            CliFilter::Nearest => ResampleFilter::Nearest,
            CliFilter::Triangle => ResampleFilter::Triangle,
            CliFilter::CatmullRom => ResampleFilter::CatmullRom,
            CliFilter::Gaussian => ResampleFilter::Gaussian,
            CliFilter::Lanczos3 => ResampleFilter::Lanczos3,
        }
    }
}
