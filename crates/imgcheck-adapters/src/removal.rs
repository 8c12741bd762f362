//! Background removal adapter.
//!
//! Wraps the opaque segmentation capability: decode input bytes, obtain a
//! foreground mask, multiply it into the alpha channel, and encode the
//! result as a transparent PNG.

use std::io::Cursor;

use image::{GenericImageView, ImageFormat};
use imgcheck_core::{BackgroundModel, RemovalError};
use tracing::debug;

/// Background removal adapter over any [`BackgroundModel`].
pub struct BackgroundRemover {
    model: Box<dyn BackgroundModel>,
}

impl BackgroundRemover {
    /// Creates an adapter delegating to the given model.
    #[must_use]
    pub fn new(model: Box<dyn BackgroundModel>) -> Self {
        Self { model }
    }

    /// Removes the background from encoded image bytes.
    ///
    /// Returns PNG bytes with an alpha channel; removed pixels are
    /// transparent. Existing alpha is scaled by the predicted mask rather
    /// than replaced.
    ///
    /// # Errors
    ///
    /// - [`RemovalError::InvalidImage`] if the bytes do not decode.
    /// - [`RemovalError::ModelFailure`] if the model fails or returns a mask
    ///   with mismatched dimensions. Not retried.
    pub fn remove(&self, data: &[u8]) -> Result<Vec<u8>, RemovalError> {
        if data.is_empty() {
            return Err(RemovalError::InvalidImage("empty input".into()));
        }

        let image =
            image::load_from_memory(data).map_err(|e| RemovalError::InvalidImage(e.to_string()))?;
        let (width, height) = image.dimensions();

        let mask = self
            .model
            .predict_mask(&image)
            .map_err(|e| RemovalError::ModelFailure(format!("{e:#}")))?;

        if mask.dimensions() != (width, height) {
            return Err(RemovalError::ModelFailure(format!(
                "mask dimensions {:?} do not match image {:?}",
                mask.dimensions(),
                (width, height)
            )));
        }

        debug!(
            model = self.model.name(),
            width, height, "applying foreground mask"
        );

        let mut rgba = image.into_rgba8();
        for (pixel, mask_pixel) in rgba.pixels_mut().zip(mask.pixels()) {
            let alpha = u16::from(pixel.0[3]) * u16::from(mask_pixel.0[0]) / 255;
            #[allow(clippy::cast_possible_truncation)]
            {
                pixel.0[3] = alpha as u8;
            }
        }

        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| RemovalError::ModelFailure(format!("failed to encode result: {e}")))?;

        Ok(out.into_inner())
    }
}
