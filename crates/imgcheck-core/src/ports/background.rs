//! Port for the opaque background segmentation capability.

use image::{DynamicImage, GrayImage};

/// Narrow interface over a pretrained segmentation model.
///
/// Keeping the model behind a single method lets the removal adapter be
/// tested with a stub implementation, decoupled from real weights.
pub trait BackgroundModel: Send + Sync {
    /// Returns the name of this model.
    fn name(&self) -> &'static str;

    /// Predicts a foreground alpha mask for the image.
    ///
    /// The mask must have the same dimensions as the input; 255 means fully
    /// foreground, 0 fully background.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails. Failures are unrecoverable for
    /// the request and never retried.
    fn predict_mask(&self, image: &DynamicImage) -> anyhow::Result<GrayImage>;
}
