//! Models command - manage segmentation models.

use anyhow::Result;
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use imgcheck_adapters::models::{
    ensure_models, list_models, models_dir, set_models_dir, ProgressCallback, MODELS,
};

use crate::config::AppConfig;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download required models
    Fetch,
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs) -> Result<()> {
    if let Some(dir) = AppConfig::load().models.dir {
        set_models_dir(dir);
    }

    match args.command {
        ModelsCommand::Fetch => fetch(),
        ModelsCommand::List => list(),
        ModelsCommand::Path => print_path(),
    }
}

fn fetch() -> Result<()> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?
            .progress_chars("#>-"),
    );

    let bar_handle = bar.clone();
    let progress: ProgressCallback = Box::new(move |name, downloaded, total| {
        if let Some(t) = total {
            bar_handle.set_length(t);
        }
        bar_handle.set_message(name.to_string());
        bar_handle.set_position(downloaded);
    });

    ensure_models(Some(&progress))?;
    bar.finish_with_message("All models downloaded");
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn list() -> Result<()> {
    let models = list_models();
    let dir = models_dir();

    println!("Models directory: {}", dir.display());
    println!();

    for (name, installed) in &models {
        let status = if *installed { "✓" } else { "✗" };
        let filename = MODELS
            .iter()
            .find(|m| m.name == name)
            .map_or("unknown", |m| m.filename);
        println!("  {status} {name} ({filename})");
    }

    println!();
    let installed = models.iter().filter(|(_, installed)| *installed).count();
    println!("{}/{} models installed", installed, models.len());

    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn print_path() -> Result<()> {
    println!("{}", models_dir().display());
    Ok(())
}
