//! Model downloading and caching adapter.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Placeholder checksum indicating verification should be skipped.
const PLACEHOLDER_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Progress callback: `(model name, downloaded bytes, total bytes if known)`.
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

/// Model metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Download URL.
    pub url: &'static str,
    /// Expected SHA256 hash. All zeros skips verification.
    pub sha256: &'static str,
    /// Filename in the models directory.
    pub filename: &'static str,
}

/// Known models.
pub const MODELS: &[ModelInfo] = &[ModelInfo {
    name: "u2net",
    url: "https://github.com/imgcheck/imgcheck/releases/download/models-v1/u2net.safetensors",
    sha256: "0000000000000000000000000000000000000000000000000000000000000000",
    filename: "u2net.safetensors",
}];

/// Override for the models directory, settable from CLI/config.
static MODELS_DIR_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Overrides the models directory for this process.
///
/// Later calls after the first are ignored; the first configured value wins.
pub fn set_models_dir(dir: PathBuf) {
    let _ = MODELS_DIR_OVERRIDE.set(dir);
}

/// Returns the models directory path.
///
/// Uses the configured override, else `XDG_DATA_HOME/imgcheck/models`.
#[must_use]
pub fn models_dir() -> PathBuf {
    if let Some(dir) = MODELS_DIR_OVERRIDE.get() {
        return dir.clone();
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("imgcheck")
        .join("models")
}

/// Returns the path a model would be stored at, if the name is known.
#[must_use]
pub fn model_path(name: &str) -> Option<PathBuf> {
    MODELS
        .iter()
        .find(|m| m.name == name)
        .map(|m| models_dir().join(m.filename))
}

/// Lists models with their installed status.
#[must_use]
pub fn list_models() -> Vec<(String, bool)> {
    let dir = models_dir();
    MODELS
        .iter()
        .map(|m| (m.name.to_string(), dir.join(m.filename).exists()))
        .collect()
}

/// Ensures all required models are downloaded.
///
/// # Errors
///
/// Returns an error if the models directory cannot be created, a download
/// fails, or a checksum mismatches.
pub fn ensure_models(progress: Option<&ProgressCallback>) -> Result<()> {
    let dir = models_dir();
    fs::create_dir_all(&dir).context("Failed to create models directory")?;

    for model in MODELS {
        let path = dir.join(model.filename);
        if path.exists() {
            debug!("Model {} already present", model.name);
        } else {
            download_model(model, &path, progress)?;
        }
    }

    Ok(())
}

/// Downloads a model and verifies its checksum.
fn download_model(
    model: &ModelInfo,
    path: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    info!("Downloading model: {}", model.name);

    let response = reqwest::blocking::get(model.url)
        .with_context(|| format!("Failed to download {}", model.name))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    if let Some(cb) = progress {
        cb(model.name, 0, total);
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("Failed to read response for {}", model.name))?;

    if let Some(cb) = progress {
        cb(model.name, bytes.len() as u64, total);
    }

    verify_checksum(model, &bytes)?;

    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", model.name))?;
    info!("Downloaded {} ({} bytes)", model.name, bytes.len());
    Ok(())
}

fn verify_checksum(model: &ModelInfo, bytes: &[u8]) -> Result<()> {
    if model.sha256 == PLACEHOLDER_CHECKSUM {
        debug!("Skipping checksum verification for {}", model.name);
        return Ok(());
    }

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = format!("{:x}", hasher.finalize());

    if hash != model.sha256 {
        anyhow::bail!(
            "Checksum mismatch for {}: expected {}, got {}",
            model.name,
            model.sha256,
            hash
        );
    }

    Ok(())
}
