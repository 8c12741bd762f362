//! CLI command definitions and handlers.

pub mod analyze;
pub mod models;
pub mod remove_bg;

use clap::{Parser, Subcommand};

/// Imgcheck - Image quality analysis and background removal
#[derive(Parser)]
#[command(name = "imgcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared analyze arguments (paths, thresholds, flags).
    #[command(flatten)]
    pub analyze: analyze::AnalyzeArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze image quality (resolution, blur detection, clarity)
    Analyze(analyze::AnalyzeArgs),
    /// Remove image backgrounds using the segmentation model
    RemoveBg(remove_bg::RemoveBgArgs),
    /// Manage segmentation models
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// All images processed, none blurry.
    Success,
    /// At least one image classified blurry or failed analysis.
    FindingsReported,
    /// The command itself failed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::FindingsReported => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
