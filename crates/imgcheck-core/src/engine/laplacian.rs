//! Laplacian edge-response variance.
//!
//! Sharp images produce high-variance edge responses; blur smears edges and
//! drives the variance toward zero.

use image::GrayImage;

/// Minimum dimension the 3x3 kernel can operate on.
const KERNEL_SIZE: u32 = 3;

/// Computes the variance of the 4-neighbour Laplacian over a grayscale image.
///
/// The kernel is applied to interior pixels only:
///
/// ```text
///  0  1  0
///  1 -4  1
///  0  1  0
/// ```
///
/// Images smaller than the kernel (below 3x3) have no interior and yield
/// `0.0` rather than failing.
#[must_use]
pub fn variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < KERNEL_SIZE || height < KERNEL_SIZE {
        return 0.0;
    }

    let count = f64::from(width - 2) * f64::from(height - 2);
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = i32::from(gray.get_pixel(x, y).0[0]);
            let top = i32::from(gray.get_pixel(x, y - 1).0[0]);
            let bottom = i32::from(gray.get_pixel(x, y + 1).0[0]);
            let left = i32::from(gray.get_pixel(x - 1, y).0[0]);
            let right = i32::from(gray.get_pixel(x + 1, y).0[0]);

            let response = f64::from(top + bottom + left + right - 4 * center);
            sum += response;
            sum_sq += response * response;
        }
    }

    let mean = sum / count;
    // Population variance; clamp tiny negative float error to zero.
    (sum_sq / count - mean * mean).max(0.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use image::Luma;

    fn uniform(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_fn(width, height, |_, _| Luma([value]))
    }

    #[test]
    fn test_uniform_image_has_zero_variance() {
        assert_eq!(variance(&uniform(64, 64, 128)), 0.0);
        assert_eq!(variance(&uniform(3, 3, 0)), 0.0);
        assert_eq!(variance(&uniform(100, 7, 255)), 0.0);
    }

    #[test]
    fn test_below_kernel_size_is_zero() {
        assert_eq!(variance(&uniform(1, 1, 42)), 0.0);
        assert_eq!(variance(&uniform(2, 2, 42)), 0.0);
        assert_eq!(variance(&uniform(2, 100, 42)), 0.0);
    }

    #[test]
    fn test_checkerboard_has_high_variance() {
        let img = GrayImage::from_fn(64, 64, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        // Single-pixel checkerboard is the extreme edge-response case.
        assert!(variance(&img) > 10_000.0);
    }

    #[test]
    fn test_smooth_gradient_has_low_variance() {
        #[allow(clippy::cast_possible_truncation)]
        let img = GrayImage::from_fn(256, 16, |x, _| Luma([x as u8]));
        // Constant slope: Laplacian is zero everywhere except rounding noise.
        assert!(variance(&img) < 1.0);
    }

    #[test]
    fn test_single_edge_beats_gradient() {
        let edge = GrayImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        #[allow(clippy::cast_possible_truncation)]
        let gradient = GrayImage::from_fn(64, 64, |x, _| Luma([(x * 4) as u8]));
        assert!(variance(&edge) > variance(&gradient));
    }
}
