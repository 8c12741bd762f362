//! Resolution adequacy scoring.

/// Maps a pixel count onto `[0, 100]` against a reference area.
///
/// Linear in pixel count, saturating at 100 for images at or above the
/// reference resolution. Monotonically non-decreasing in `pixels`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(pixels: u64, reference_pixels: u64) -> f64 {
    if reference_pixels == 0 {
        return 100.0;
    }
    ((pixels as f64 / reference_pixels as f64) * 100.0).min(100.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_resolution_scores_100() {
        assert_eq!(score(65_536, 65_536), 100.0);
    }

    #[test]
    fn test_saturates_above_reference() {
        assert_eq!(score(4000 * 3000, 65_536), 100.0);
        assert_eq!(score(u64::MAX, 65_536), 100.0);
    }

    #[test]
    fn test_proportional_below_reference() {
        assert_eq!(score(65_536 / 2, 65_536), 50.0);
        assert_eq!(score(65_536 / 4, 65_536), 25.0);
        assert_eq!(score(0, 65_536), 0.0);
    }

    #[test]
    fn test_monotonic_in_pixel_count() {
        let reference = 65_536;
        let mut last = 0.0;
        for pixels in (0..200_000).step_by(1000) {
            let s = score(pixels, reference);
            assert!(s >= last, "score decreased at {pixels} pixels");
            assert!((0.0..=100.0).contains(&s));
            last = s;
        }
    }
}
