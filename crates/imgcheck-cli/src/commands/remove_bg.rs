//! Remove-bg command - strip image backgrounds.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use imgcheck_adapters::{model_path, removal::BackgroundRemover, set_models_dir, FsImageSource};
use imgcheck_core::inference::SaliencyBackground;
use imgcheck_core::ImageSource;
use tracing::{info, warn};

use super::ExitCode;
use crate::config::AppConfig;

/// Arguments for the remove-bg command.
#[derive(Args)]
pub struct RemoveBgArgs {
    /// Files or directories to process
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Directory to write results into (defaults to each input's directory)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Custom models directory
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,
}

/// Run the remove-bg command.
pub fn run(args: &RemoveBgArgs) -> Result<ExitCode> {
    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    // CLI flag wins over the config file's [models] dir.
    let config = AppConfig::load();
    if let Some(dir) = args.models_dir.clone().or(config.models.dir) {
        set_models_dir(dir);
    }

    let weights = model_path("u2net").context("unknown model configuration")?;
    if !weights.exists() {
        anyhow::bail!(
            "Segmentation model not found at {}. Run `imgcheck models fetch` first.",
            weights.display()
        );
    }

    if let Some(ref dir) = args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let remover = BackgroundRemover::new(Box::new(SaliencyBackground::new(weights)));
    let source = FsImageSource::new(args.paths.clone(), args.recursive);

    let mut processed = 0usize;
    let mut failed = 0usize;

    for image_result in source.images() {
        let raw = match image_result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping unreadable image: {e:#}");
                failed += 1;
                continue;
            }
        };

        match remover.remove(&raw.bytes) {
            Ok(png) => {
                let out_path = output_path(Path::new(&raw.filename), args.out_dir.as_deref());
                std::fs::write(&out_path, png)
                    .with_context(|| format!("Failed to write {}", out_path.display()))?;
                info!("Wrote {}", out_path.display());
                processed += 1;
            }
            Err(e) => {
                eprintln!("error: {}: {e}", raw.filename);
                failed += 1;
            }
        }
    }

    println!("Processed {processed} images, {failed} failed");

    Ok(if failed > 0 {
        ExitCode::FindingsReported
    } else {
        ExitCode::Success
    })
}

/// Output path for a processed image: `no_bg_<stem>.png` next to the input
/// or under the requested directory.
fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let name = format!("no_bg_{stem}.png");

    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
