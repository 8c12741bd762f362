//! Analyze command - score image quality.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use imgcheck_adapters::FsImageSource;
use imgcheck_core::{
    AnalysisRecord, ErrorReport, ImageSource, ProgressEvent, ProgressSink, QualityConfig,
    QualityEngine, ResultOutput,
};
use tracing::info;

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for records.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Hardcoded fallback values for engine tunables.
mod defaults {
    pub const REFERENCE_PIXELS: u64 = 256 * 256;
    pub const BLUR_THRESHOLD: f64 = 100.0;
    pub const CLARITY_CUTPOINTS: [f64; 3] = [100.0, 300.0, 1000.0];
    pub const MAX_PIXELS: u64 = 64_000_000;
}

/// Parse and validate a non-negative threshold value.
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is negative"))
    }
}

/// Shared arguments for quality analysis.
#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Blur threshold (Laplacian variance below this is blurry)
    #[arg(long, value_parser = parse_threshold, allow_negative_numbers = true)]
    pub blur_threshold: Option<f64>,

    /// Reference pixel count for resolution scoring
    #[arg(long, value_name = "PIXELS")]
    pub reference_pixels: Option<u64>,

    /// Safety ceiling on decoded pixel count
    #[arg(long, value_name = "PIXELS")]
    pub max_pixels: Option<u64>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl AnalyzeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.blur_threshold = args.blur_threshold.or(config.quality.blur_threshold);
        args.reference_pixels = args.reference_pixels.or(config.quality.reference_pixels);
        args.max_pixels = args.max_pixels.or(config.quality.max_pixels);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args.config = Some(config.clone());
        args
    }

    /// Builds the engine configuration from merged args.
    fn quality_config(&self) -> QualityConfig {
        let cutpoints = self
            .config
            .as_ref()
            .and_then(|c| c.quality.clarity_cutpoints)
            .unwrap_or(defaults::CLARITY_CUTPOINTS);

        QualityConfig {
            reference_pixels: self.reference_pixels.unwrap_or(defaults::REFERENCE_PIXELS),
            blur_threshold: self.blur_threshold.unwrap_or(defaults::BLUR_THRESHOLD),
            clarity_cutpoints: cutpoints,
            max_pixels: self.max_pixels.unwrap_or(defaults::MAX_PIXELS),
        }
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }
}

/// Result of running the analyze command.
pub struct AnalyzeResult {
    /// Number of images analyzed successfully.
    pub analyzed: usize,
    /// Number of images that produced error records.
    pub failed: usize,
    /// Number of images classified as blurry.
    pub blurry: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the analyze command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    info!("Analyzing {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let engine = QualityEngine::new(args.quality_config());
    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);
    let output = match args.format() {
        OutputFormat::Jsonl => JsonOutput::lines(),
        OutputFormat::Json => JsonOutput::array(args.pretty),
    };

    process_images(&engine, &source, &output, &progress)
}

/// Drives the batch: per image, analyze and emit exactly one record.
///
/// Takes the ports, not concrete adapters, so the loop can be exercised
/// against in-memory sources and sinks.
fn process_images(
    engine: &QualityEngine,
    source: &dyn ImageSource,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
) -> Result<AnalyzeResult> {
    let total = source.count_hint();
    let mut analyzed = 0usize;
    let mut failed = 0usize;
    let mut blurry = 0usize;

    for (index, image_result) in source.images().enumerate() {
        // Read failures and analysis failures both become error records:
        // the boundary never lets a bad input crash the batch.
        let record = match image_result {
            Ok(raw) => {
                progress.on_event(ProgressEvent::Started {
                    filename: raw.filename.clone(),
                    index,
                    total,
                });

                match engine.analyze(&raw.filename, &raw.bytes) {
                    Ok(report) => {
                        analyzed += 1;
                        if report.is_blurry {
                            blurry += 1;
                        }
                        AnalysisRecord::Report(report)
                    }
                    Err(e) => {
                        failed += 1;
                        AnalysisRecord::Error(ErrorReport::new(raw.filename, e.to_string()))
                    }
                }
            }
            Err(e) => {
                failed += 1;
                AnalysisRecord::Error(ErrorReport::new(format!("image {index}"), format!("{e:#}")))
            }
        };

        progress.on_event(ProgressEvent::Completed {
            record: record.clone(),
        });

        output.write(&record)?;
    }

    output.flush()?;
    progress.on_event(ProgressEvent::Finished { analyzed, failed });

    let exit_code = if failed > 0 || blurry > 0 {
        ExitCode::FindingsReported
    } else {
        ExitCode::Success
    };

    Ok(AnalyzeResult {
        analyzed,
        failed,
        blurry,
        exit_code,
    })
}
