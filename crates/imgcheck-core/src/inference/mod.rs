//! Candle-based inference for the background segmentation model.

mod loader;
mod u2net;

pub use loader::{load_weights, LazyModel};
pub use u2net::{SaliencyBackground, U2NetLite};

use candle_core::Device;
use tracing::info;

/// Returns the best available device for inference.
///
/// Prefers GPU (Metal on macOS, CUDA elsewhere) when the corresponding
/// feature is enabled and a device is present, falling back to CPU.
#[must_use]
pub fn get_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Using Metal device for inference");
            return device;
        }
    }

    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Using CUDA device for inference");
            return device;
        }
    }

    info!("Using CPU for inference");
    Device::Cpu
}
