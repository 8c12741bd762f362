//! Model weight loading for the safetensors format.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use once_cell::sync::OnceCell;
use tracing::debug;

/// A model that defers weight loading until first use.
///
/// Model files can be hundreds of megabytes; commands that never touch the
/// model should not pay for it.
pub struct LazyModel<T> {
    path: PathBuf,
    device: Device,
    builder: fn(VarBuilder) -> Result<T>,
    model: OnceCell<T>,
}

impl<T: Send + Sync> LazyModel<T> {
    /// Creates a new lazy model loader.
    #[must_use]
    pub fn new(path: impl AsRef<Path>, device: Device, builder: fn(VarBuilder) -> Result<T>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            device,
            builder,
            model: OnceCell::new(),
        }
    }

    /// Gets the model, loading weights on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights file cannot be read, is not valid
    /// safetensors data, or the model builder rejects it.
    pub fn get(&self) -> Result<&T> {
        self.model.get_or_try_init(|| {
            let vb = load_weights(&self.path, &self.device)?;
            (self.builder)(vb)
        })
    }

    /// Returns true if the model has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }
}

/// Loads a safetensors file into a `VarBuilder`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_weights(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("Loading weights from {}", path.display());

    let tensors = candle_core::safetensors::load(path, device)
        .with_context(|| format!("Failed to load weights: {}", path.display()))?;

    Ok(VarBuilder::from_tensors(tensors, DType::F32, device))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_test_weights() -> NamedTempFile {
        use safetensors::tensor::TensorView;
        use safetensors::{serialize, Dtype};

        let data: Vec<f32> = vec![0.5, -0.5, 1.0, 0.0];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        let view = TensorView::new(Dtype::F32, vec![2, 2], bytes).expect("valid tensor view");

        let tensors = HashMap::from([("weight".to_string(), view)]);
        let serialized = serialize(&tensors, &None).expect("serialize");

        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&serialized).expect("write");
        file
    }

    #[test]
    fn test_load_weights() {
        let file = write_test_weights();
        assert!(load_weights(file.path(), &Device::Cpu).is_ok());
    }

    #[test]
    fn test_load_weights_missing_file() {
        assert!(load_weights("/nonexistent/model.safetensors", &Device::Cpu).is_err());
    }

    #[test]
    fn test_lazy_model_defers_loading() {
        struct Dummy;
        let file = write_test_weights();
        let lazy: LazyModel<Dummy> = LazyModel::new(file.path(), Device::Cpu, |_vb| Ok(Dummy));

        assert!(!lazy.is_loaded());
        lazy.get().expect("load dummy model");
        assert!(lazy.is_loaded());
    }
}
