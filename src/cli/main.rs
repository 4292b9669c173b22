//! Background Extension CLI Tool
//!
//! Command-line interface for extending image backgrounds by edge repetition.

use super::config::CliConfigBuilder;
use crate::{
    compositor::EdgeExtensionCompositor,
    config::{ExportConfig, OutputFormat},
    services::{ImageIOService, OutputFormatHandler},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use crate::tracing_config::TracingFormat;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Image extensions accepted as inputs
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif"];

/// Extend image backgrounds by repeating their edges
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bg-extend")]
pub struct Cli {
    /// Input image files or directories (use "-" for stdin)
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<String>,

    /// Output file (single input) or directory (batch processing). Use "-" for stdout.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Output format [default: inferred from --output, otherwise png]
    #[arg(short, long, value_enum)]
    pub format: Option<CliOutputFormat>,

    /// Uniform margin in pixels on every side [default: 50]
    #[arg(short, long, conflicts_with_all = ["width", "height"])]
    pub padding: Option<u32>,

    /// Target width for fit mode (requires --height)
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Target height for fit mode (requires --width)
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Thickness in pixels of the sampled edge strip
    #[arg(short, long, default_value_t = crate::config::DEFAULT_EDGE_STRIP_SIZE)]
    pub edge_size: u32,

    /// Blur the original image in the center (the extended border stays sharp)
    #[arg(long)]
    pub blur: bool,

    /// Gaussian sigma for --blur
    #[arg(long, default_value_t = crate::config::DEFAULT_BLUR_SIGMA)]
    pub blur_sigma: f32,

    /// Resampling filter for stretched strips and scaled content
    #[arg(long, value_enum, default_value_t = CliFilter::Triangle)]
    pub filter: CliFilter,

    /// JPEG quality (0-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// JSON composition config file (replaces all composition flags)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[cfg(feature = "tracing-json")]
    #[arg(long)]
    pub log_json: bool,

    /// Process directory recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Pattern for batch processing (e.g., "*.jpg")
    #[arg(long)]
    pub pattern: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
    Webp,
    Tiff,
    Rgba8,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Png => Self::Png,
            CliOutputFormat::Jpeg => Self::Jpeg,
            CliOutputFormat::Webp => Self::WebP,
            CliOutputFormat::Tiff => Self::Tiff,
            CliOutputFormat::Rgba8 => Self::Rgba8,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

/// One image to process and the root it was discovered under
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct InputFile {
    path: PathBuf,
    root: PathBuf,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    crate::tracing_config::init_cli_tracing(cli.verbose, log_format(&cli))
        .context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let (composition, export) =
        CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    info!(
        mode = %composition.mode,
        edge_strip_size = composition.edge_strip_size,
        blur = composition.blur,
        format = %export.format,
        "Starting background extension"
    );

    let compositor =
        EdgeExtensionCompositor::new(composition).context("Failed to create compositor")?;

    let start_time = Instant::now();
    let processed_count = process_inputs(&cli, &compositor, &export).await?;

    info!(
        "Processed {} image(s) in {:.2}s",
        processed_count,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Pick the log format: JSON when requested, compact without colors when
/// stderr is not a terminal
fn log_format(cli: &Cli) -> TracingFormat {
    #[cfg(feature = "tracing-json")]
    if cli.log_json {
        return TracingFormat::Json;
    }
    #[cfg(not(feature = "tracing-json"))]
    let _ = cli;

    if std::io::stderr().is_terminal() {
        TracingFormat::Console
    } else {
        TracingFormat::Compact
    }
}

async fn process_inputs(
    cli: &Cli,
    compositor: &EdgeExtensionCompositor,
    export: &ExportConfig,
) -> Result<usize> {
    if cli.input.len() == 1 && cli.input.first().is_some_and(|s| s == "-") {
        process_stdin(cli.output.as_deref(), compositor, export).await?;
        return Ok(1);
    }

    let mut all_files = collect_input_files(cli)?;
    if all_files.is_empty() {
        warn!("No supported image files found in the provided inputs");
        return Ok(0);
    }

    // Alphanumerical order keeps batch output deterministic
    all_files.sort();
    all_files.dedup();
    let file_count = all_files.len();
    info!("Found {} image file(s) to process", file_count);

    let output_dir = prepare_output_dir(cli.output.as_deref(), file_count)?;

    let progress = if file_count > 1 {
        let pb = ProgressBar::new(file_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut processed_count = 0;
    let mut failed_count = 0;

    for input in &all_files {
        if let Some(ref pb) = progress {
            pb.set_message(format!("{}", input.path.display()));
        }

        let output_target = match (&output_dir, cli.output.as_deref()) {
            (Some(dir), _) => OutputTarget::File(generate_output_path_with_dir(
                &input.path,
                &input.root,
                dir,
                export.format,
            )),
            (None, Some("-")) => OutputTarget::Stdout,
            (None, Some(path)) => OutputTarget::File(PathBuf::from(path)),
            (None, None) => OutputTarget::File(generate_output_path(&input.path, export.format)),
        };

        match process_single_file(&input.path, &output_target, compositor, export) {
            Ok(()) => processed_count += 1,
            Err(e) => {
                failed_count += 1;
                error!("Failed to process {}: {:#}", input.path.display(), e);
            },
        }

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    if failed_count > 0 {
        anyhow::bail!(
            "{} of {} file(s) failed to process",
            failed_count,
            file_count
        );
    }

    Ok(processed_count)
}

/// Where a single result is written
#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputTarget {
    File(PathBuf),
    Stdout,
}

async fn process_stdin(
    output: Option<&str>,
    compositor: &EdgeExtensionCompositor,
    export: &ExportConfig,
) -> Result<()> {
    debug!("Reading image from stdin");
    let result = crate::extend_background_from_reader(tokio::io::stdin(), compositor.config())
        .await
        .context("Failed to process image from stdin")?;

    match output {
        None | Some("-") => {
            let bytes = result.to_bytes(export).context("Failed to encode result")?;
            write_stdout(&bytes)
        },
        Some(path) => result
            .save(path, export)
            .with_context(|| format!("Failed to save result to {}", path)),
    }
}

fn process_single_file(
    input_path: &Path,
    output: &OutputTarget,
    compositor: &EdgeExtensionCompositor,
    export: &ExportConfig,
) -> Result<()> {
    let file_start = Instant::now();

    let image = ImageIOService::load_image(input_path)
        .with_context(|| format!("Failed to load {}", input_path.display()))?;
    if drops_transparency(&image, export.format) {
        warn!(
            "{} has an alpha channel; {} output will drop it",
            input_path.display(),
            export.format
        );
    }
    let source = image.to_rgba8();
    let mut result = compositor
        .compose(&source)
        .with_context(|| format!("Failed to compose {}", input_path.display()))?
        .with_input_path(input_path);

    match output {
        OutputTarget::Stdout => {
            let bytes = result.to_bytes(export).context("Failed to encode result")?;
            write_stdout(&bytes)?;
        },
        OutputTarget::File(path) => {
            let path = if path.is_dir() {
                generate_output_path_with_dir(
                    input_path,
                    input_path.parent().unwrap_or(Path::new(".")),
                    path,
                    export.format,
                )
            } else {
                path.clone()
            };
            result
                .save_timed(&path, export)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            info!(
                "{} -> {} ({}x{}, {}ms)",
                input_path.display(),
                path.display(),
                result.image.width(),
                result.image.height(),
                file_start.elapsed().as_millis()
            );
        },
    }

    debug!("{}", result.timing_summary());
    Ok(())
}

fn write_stdout(data: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(data)
        .context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Resolve CLI inputs into image files, expanding directories
fn collect_input_files(cli: &Cli) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();

    for input in &cli.input {
        let path = PathBuf::from(input);

        if path.is_file() {
            if is_image_file(&path) {
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                files.push(InputFile { path, root });
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for found in find_image_files(&path, cli.recursive, cli.pattern.as_deref())? {
                files.push(InputFile {
                    path: found,
                    root: path.clone(),
                });
            }
        } else {
            anyhow::bail!(
                "Input path does not exist or is not accessible: {}",
                path.display()
            );
        }
    }

    Ok(files)
}

/// Create (or check) the output directory used for batches
fn prepare_output_dir(output: Option<&str>, file_count: usize) -> Result<Option<PathBuf>> {
    if file_count <= 1 {
        return Ok(None);
    }
    let Some(output) = output else {
        return Ok(None);
    };
    if output == "-" {
        anyhow::bail!("Cannot use stdout (-) as output when processing multiple files");
    }

    let output_path = PathBuf::from(output);
    if output_path.is_file() {
        anyhow::bail!(
            "Output path exists and is a file, not a directory: {}",
            output_path.display()
        );
    }
    std::fs::create_dir_all(&output_path).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;
    Ok(Some(output_path))
}

/// Find all image files in a directory
fn find_image_files(dir: &Path, recursive: bool, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry?;
            if entry.file_type().is_file() {
                let path = entry.path();
                if is_image_file(path) && matches_pattern(path, pattern) {
                    files.push(path.to_path_buf());
                }
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let path = entry.path();
                if is_image_file(&path) && matches_pattern(&path, pattern) {
                    files.push(path);
                }
            }
        }
    }

    Ok(files)
}

/// True when the input carries alpha the output format cannot store
fn drops_transparency(image: &image::DynamicImage, format: OutputFormat) -> bool {
    image.color().has_alpha() && !OutputFormatHandler::supports_transparency(format)
}

/// Check if file is an image based on extension
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Check if file matches the given pattern
fn matches_pattern(path: &Path, pattern: Option<&str>) -> bool {
    match pattern {
        Some(pat) => path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|filename| {
                glob::Pattern::new(pat)
                    .map(|p| p.matches(filename))
                    .unwrap_or(false)
            }),
        None => true,
    }
}

/// Generate output path beside the input with the format's extension
fn generate_output_path(input_path: &Path, format: OutputFormat) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let dir = input_path.parent().unwrap_or(Path::new("."));

    dir.join(format!(
        "{}_extended.{}",
        stem.to_string_lossy(),
        OutputFormatHandler::get_extension(format)
    ))
}

/// Generate output path inside `output_dir`, preserving the structure below `root`
fn generate_output_path_with_dir(
    input_path: &Path,
    root: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let relative_parent = input_path
        .parent()
        .and_then(|parent| parent.strip_prefix(root).ok())
        .unwrap_or(Path::new(""));

    output_dir.join(relative_parent).join(format!(
        "{}_extended.{}",
        stem.to_string_lossy(),
        OutputFormatHandler::get_extension(format)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_padding_mode() {
        let cli = Cli::try_parse_from(["bg-extend", "in.png", "-p", "20", "-e", "4", "--blur"])
            .unwrap();
        assert_eq!(cli.padding, Some(20));
        assert_eq!(cli.edge_size, 4);
        assert!(cli.blur);
        assert_eq!(cli.format, None);
    }

    #[test]
    fn test_cli_fit_requires_both_dimensions() {
        assert!(Cli::try_parse_from(["bg-extend", "in.png", "--width", "100"]).is_err());
        let cli =
            Cli::try_parse_from(["bg-extend", "in.png", "--width", "100", "--height", "50"])
                .unwrap();
        assert_eq!((cli.width, cli.height), (Some(100), Some(50)));
    }

    #[test]
    fn test_cli_padding_conflicts_with_fit() {
        let result = Cli::try_parse_from([
            "bg-extend", "in.png", "--padding", "5", "--width", "10", "--height", "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_negative_padding() {
        assert!(Cli::try_parse_from(["bg-extend", "in.png", "--padding", "-5"]).is_err());
    }

    #[test]
    fn test_drops_transparency() {
        let rgba = image::DynamicImage::new_rgba8(2, 2);
        let rgb = image::DynamicImage::new_rgb8(2, 2);
        assert!(drops_transparency(&rgba, OutputFormat::Jpeg));
        assert!(!drops_transparency(&rgba, OutputFormat::Png));
        assert!(!drops_transparency(&rgb, OutputFormat::Jpeg));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a/b/photo.JPG")));
        assert!(is_image_file(Path::new("scan.tif")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern(Path::new("dir/cat.jpg"), Some("*.jpg")));
        assert!(!matches_pattern(Path::new("dir/cat.png"), Some("*.jpg")));
        assert!(matches_pattern(Path::new("dir/cat.png"), None));
    }

    #[test]
    fn test_generate_output_path() {
        let path = generate_output_path(Path::new("photos/cat.jpeg"), OutputFormat::WebP);
        assert_eq!(path, PathBuf::from("photos/cat_extended.webp"));
    }

    #[test]
    fn test_generate_output_path_with_dir_preserves_structure() {
        let path = generate_output_path_with_dir(
            Path::new("in/sub/dog.png"),
            Path::new("in"),
            Path::new("out"),
            OutputFormat::Jpeg,
        );
        assert_eq!(path, PathBuf::from("out/sub/dog_extended.jpg"));
    }

    #[test]
    fn test_find_image_files_respects_recursion() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join("a.png"), b"").unwrap();
        std::fs::write(temp_dir.path().join("b.txt"), b"").unwrap();
        std::fs::write(nested.join("c.jpg"), b"").unwrap();

        let flat = find_image_files(temp_dir.path(), false, None).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = find_image_files(temp_dir.path(), true, None).unwrap();
        assert_eq!(deep.len(), 2);

        let filtered = find_image_files(temp_dir.path(), true, Some("*.jpg")).unwrap();
        assert_eq!(filtered, vec![nested.join("c.jpg")]);
    }

    #[test]
    fn test_prepare_output_dir() {
        assert!(prepare_output_dir(Some("-"), 2).is_err());
        assert_eq!(prepare_output_dir(Some("anything"), 1).unwrap(), None);

        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("batch_out");
        let created = prepare_output_dir(out.to_str(), 3).unwrap();
        assert_eq!(created, Some(out.clone()));
        assert!(out.is_dir());
    }
}
