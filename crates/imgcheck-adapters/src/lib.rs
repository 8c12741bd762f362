//! Imgcheck Adapters - External adapters for imgcheck.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Background removal (decode, segment, alpha composite, encode)
//! - Model downloading and caching

pub mod fs;
pub mod models;
pub mod removal;

pub use fs::FsImageSource;
pub use models::{model_path, models_dir, set_models_dir};
pub use removal::BackgroundRemover;
