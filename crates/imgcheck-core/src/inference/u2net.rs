//! Compact U²-Net-style saliency network for background segmentation.
//!
//! A three-scale encoder/decoder distilled from U²-Net, small enough to run
//! on CPU per request. Input is resized to 320x320; the predicted saliency
//! map is resized back to the source dimensions.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{Device, Module, Tensor};
use candle_nn::{conv2d, Conv2d, Conv2dConfig, VarBuilder};
use image::{imageops::FilterType, DynamicImage, GenericImageView, GrayImage};

use super::{get_device, LazyModel};
use crate::ports::BackgroundModel;

/// Side length of the square network input.
pub const INPUT_SIZE: usize = 320;

/// Compact saliency net.
///
/// Encoder: 3 conv stages (16/32/64 channels) with 2x2 max pooling.
/// Decoder: nearest-neighbour upsampling with skip concatenation.
/// Output: single-channel logit map at input resolution.
pub struct U2NetLite {
    enc1: Conv2d,
    enc2: Conv2d,
    enc3: Conv2d,
    bridge: Conv2d,
    dec2: Conv2d,
    dec1: Conv2d,
    out: Conv2d,
}

impl U2NetLite {
    /// Builds the network from loaded weights.
    ///
    /// # Errors
    ///
    /// Returns an error if any expected tensor is missing or mis-shaped.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let pad1 = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };

        let enc1 = conv2d(3, 16, 3, pad1, vb.pp("enc1"))?;
        let enc2 = conv2d(16, 32, 3, pad1, vb.pp("enc2"))?;
        let enc3 = conv2d(32, 64, 3, pad1, vb.pp("enc3"))?;
        let bridge = conv2d(64, 64, 3, pad1, vb.pp("bridge"))?;
        // Decoder convs consume the upsampled features concatenated with the
        // matching encoder skip: 64+32 and 32+16 channels.
        let dec2 = conv2d(96, 32, 3, pad1, vb.pp("dec2"))?;
        let dec1 = conv2d(48, 16, 3, pad1, vb.pp("dec1"))?;
        let out = conv2d(16, 1, 3, pad1, vb.pp("out"))?;

        Ok(Self {
            enc1,
            enc2,
            enc3,
            bridge,
            dec2,
            dec1,
            out,
        })
    }
}

impl Module for U2NetLite {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        // Encoder
        let e1 = self.enc1.forward(x)?.relu()?; // (B, 16, H, W)
        let p1 = e1.max_pool2d(2)?;
        let e2 = self.enc2.forward(&p1)?.relu()?; // (B, 32, H/2, W/2)
        let p2 = e2.max_pool2d(2)?;
        let e3 = self.enc3.forward(&p2)?.relu()?; // (B, 64, H/4, W/4)

        let b = self.bridge.forward(&e3)?.relu()?;

        // Decoder with skip connections; upsample to the skip's dimensions.
        let (_, _, h2, w2) = e2.dims4()?;
        let u2 = b.upsample_nearest2d(h2, w2)?;
        let d2 = self
            .dec2
            .forward(&Tensor::cat(&[&u2, &e2], 1)?)?
            .relu()?;

        let (_, _, h1, w1) = e1.dims4()?;
        let u1 = d2.upsample_nearest2d(h1, w1)?;
        let d1 = self
            .dec1
            .forward(&Tensor::cat(&[&u1, &e1], 1)?)?
            .relu()?;

        // Logit map; sigmoid is applied by the caller.
        self.out.forward(&d1)
    }
}

/// [`BackgroundModel`] implementation backed by lazily-loaded
/// [`U2NetLite`] weights.
pub struct SaliencyBackground {
    model: LazyModel<U2NetLite>,
    device: Device,
}

impl SaliencyBackground {
    /// Creates the model from a safetensors weights path.
    ///
    /// Weights are not read until the first [`BackgroundModel::predict_mask`]
    /// call.
    #[must_use]
    pub fn new(weights_path: impl AsRef<Path>) -> Self {
        let device = get_device();
        Self {
            model: LazyModel::new(weights_path, device.clone(), U2NetLite::new),
            device,
        }
    }

    /// Converts an image into a normalized `(1, 3, 320, 320)` tensor.
    fn preprocess(&self, image: &DynamicImage) -> Result<Tensor> {
        let resized = image
            .resize_exact(INPUT_SIZE as u32, INPUT_SIZE as u32, FilterType::Triangle)
            .to_rgb8();

        let data: Vec<f32> = resized.pixels().flat_map(|p| p.0).map(|v| f32::from(v) / 255.0).collect();

        // Pixels arrive HWC; the net wants NCHW.
        let tensor = Tensor::from_vec(data, (1, INPUT_SIZE, INPUT_SIZE, 3), &self.device)
            .context("Failed to create input tensor")?
            .permute((0, 3, 1, 2))
            .context("Failed to permute input tensor")?;

        Ok(tensor)
    }
}

impl BackgroundModel for SaliencyBackground {
    fn name(&self) -> &'static str {
        "u2net"
    }

    fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage> {
        let model = self.model.get()?;
        let input = self.preprocess(image)?;

        let logits = model.forward(&input).context("Inference failed")?;
        let probs = candle_nn::ops::sigmoid(&logits).context("Sigmoid failed")?;

        let values: Vec<f32> = probs
            .flatten_all()
            .and_then(|t| t.to_vec1())
            .context("Failed to read mask tensor")?;

        let data: Vec<u8> = values.iter().map(|p| (p.clamp(0.0, 1.0) * 255.0) as u8).collect();
        let mask = GrayImage::from_raw(INPUT_SIZE as u32, INPUT_SIZE as u32, data)
            .context("Mask buffer has wrong size")?;

        // Back to source resolution; the adapter expects matching dimensions.
        Ok(image::imageops::resize(
            &mask,
            image.width(),
            image.height(),
            FilterType::Triangle,
        ))
    }
}
