//! Synthetic image builders for testing.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};

/// Builder for synthetic test images.
///
/// Pixel-level constructors return [`DynamicImage`]; the `*_png` helpers
/// encode straight to bytes for feeding the engine.
pub struct SyntheticImage;

impl SyntheticImage {
    // === Decoded images ===

    /// Uniform flat-gray image (no edges; the canonical blurry input).
    #[must_use]
    pub fn flat(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |_, _| Luma([value])))
    }

    /// High-contrast checkerboard (the canonical sharp input).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> DynamicImage {
        let cell = cell_size.max(1);
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        }))
    }

    /// Smooth horizontal gradient (near-zero edge response).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, _| {
            Luma([((u32::from(u8::MAX) * x) / width.max(1)) as u8])
        }))
    }

    /// Uniform RGB color image, for exercising the luma-reduction path.
    #[must_use]
    pub fn rgb_flat(width: u32, height: u32, r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| image::Rgb([r, g, b])))
    }

    // === Encoded bytes ===

    /// Encodes any image as PNG bytes.
    ///
    /// # Panics
    ///
    /// Panics if PNG encoding fails, which cannot happen for the in-memory
    /// images built here.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, ImageFormat::Png)
            .expect("encode synthetic image as PNG");
        buf.into_inner()
    }

    /// Flat-gray PNG bytes.
    #[must_use]
    pub fn flat_png(width: u32, height: u32, value: u8) -> Vec<u8> {
        Self::png_bytes(&Self::flat(width, height, value))
    }

    /// Checkerboard PNG bytes with 1-pixel cells (maximal edge response).
    #[must_use]
    pub fn sharp_png(width: u32, height: u32) -> Vec<u8> {
        Self::png_bytes(&Self::checkerboard(width, height, 1))
    }

    /// Gradient PNG bytes.
    #[must_use]
    pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        Self::png_bytes(&Self::gradient(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_is_uniform() {
        let img = SyntheticImage::flat(16, 16, 99).to_luma8();
        assert!(img.pixels().all(|p| p.0[0] == 99));
    }

    #[test]
    fn test_checkerboard_alternates() {
        let img = SyntheticImage::checkerboard(8, 8, 1).to_luma8();
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(1, 0).0[0], 0);
    }

    #[test]
    fn test_png_bytes_round_trip() {
        let bytes = SyntheticImage::flat_png(10, 12, 128);
        let decoded = image::load_from_memory(&bytes).expect("decode PNG");
        assert_eq!(decoded.to_luma8().dimensions(), (10, 12));
    }
}
