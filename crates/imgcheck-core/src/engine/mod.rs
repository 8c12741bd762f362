//! Image quality analysis engine.
//!
//! Pure, stateless scoring of encoded image bytes: resolution adequacy,
//! Laplacian-variance blur detection, and clarity classification. Safe to
//! call from any number of threads; each call owns its decoded image and
//! discards it on return.

mod laplacian;
mod resolution;

use image::GenericImageView;
use tracing::debug;

use crate::domain::{AnalysisError, Clarity, QualityReport, Status};

/// Configuration constants the engine depends on.
///
/// Passed in at construction rather than read from globals so tests can vary
/// thresholds deterministically.
#[derive(Debug, Clone)]
pub struct QualityConfig {
    /// Reference area for resolution scoring. Images at or above this pixel
    /// count score 100. Default: 65 536 (256x256).
    pub reference_pixels: u64,
    /// Laplacian-variance threshold below which an image counts as blurry.
    /// The single most important tunable. Default: 100.0.
    pub blur_threshold: f64,
    /// Ascending cut-points partitioning the blur score into the four
    /// clarity bands. Default: `[100.0, 300.0, 1000.0]`.
    pub clarity_cutpoints: [f64; 3],
    /// Safety ceiling on decoded pixel count. Default: 64 000 000.
    pub max_pixels: u64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            reference_pixels: 256 * 256,
            blur_threshold: 100.0,
            clarity_cutpoints: [100.0, 300.0, 1000.0],
            max_pixels: 64_000_000,
        }
    }
}

/// The quality analysis engine.
pub struct QualityEngine {
    config: QualityConfig,
}

impl QualityEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub const fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Analyzes encoded image bytes and produces a [`QualityReport`].
    ///
    /// `filename` is an opaque pass-through string carried into the report.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidImage`] if `data` is empty, corrupt, or an
    ///   unsupported encoding.
    /// - [`AnalysisError::TooLarge`] if the decoded pixel count exceeds the
    ///   configured ceiling.
    pub fn analyze(&self, filename: &str, data: &[u8]) -> Result<QualityReport, AnalysisError> {
        if data.is_empty() {
            return Err(AnalysisError::InvalidImage("empty input".into()));
        }

        let image =
            image::load_from_memory(data).map_err(|e| AnalysisError::InvalidImage(e.to_string()))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidImage(
                "image has zero width or height".into(),
            ));
        }

        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.config.max_pixels {
            return Err(AnalysisError::TooLarge {
                pixels,
                limit: self.config.max_pixels,
            });
        }

        let resolution_score = round2(resolution::score(pixels, self.config.reference_pixels));

        // Luma-weighted reduction for multi-channel sources (BT.601 weights).
        let gray = image.to_luma8();
        let blur_score = round2(laplacian::variance(&gray));

        // Both derived fields come from the rounded score so the serialized
        // value stays boundary-consistent with them.
        let is_blurry = blur_score < self.config.blur_threshold;
        let clarity = self.classify(blur_score);

        debug!(
            filename,
            width, height, resolution_score, blur_score, is_blurry, "analyzed image"
        );

        Ok(QualityReport {
            filename: filename.to_string(),
            resolution_score,
            blur_score,
            is_blurry,
            clarity,
            status: Status::Success,
        })
    }

    /// Assigns the clarity band for a blur score.
    fn classify(&self, blur_score: f64) -> Clarity {
        let [low, mid, high] = self.config.clarity_cutpoints;
        if blur_score < low {
            Clarity::Blurry
        } else if blur_score < mid {
            Clarity::Acceptable
        } else if blur_score < high {
            Clarity::Clear
        } else {
            Clarity::VeryClear
        }
    }
}

impl Default for QualityEngine {
    fn default() -> Self {
        Self::new(QualityConfig::default())
    }
}

/// Rounds to two decimals, matching the report's serialized precision.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn engine() -> QualityEngine {
        QualityEngine::default()
    }

    #[test]
    fn test_classify_bands_are_monotonic() {
        let engine = engine();
        let mut last = Clarity::Blurry;
        for score in [0.0, 50.0, 99.99, 100.0, 299.0, 300.0, 999.0, 1000.0, 1e9] {
            let band = engine.classify(score);
            assert!(band >= last, "clarity decreased at score {score}");
            last = band;
        }
    }

    #[test]
    fn test_classify_cutpoint_boundaries() {
        let engine = engine();
        assert_eq!(engine.classify(99.99), Clarity::Blurry);
        assert_eq!(engine.classify(100.0), Clarity::Acceptable);
        assert_eq!(engine.classify(300.0), Clarity::Clear);
        assert_eq!(engine.classify(1000.0), Clarity::VeryClear);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let err = engine().analyze("empty.bin", &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage(_)));
    }

    #[test]
    fn test_garbage_input_is_invalid() {
        let err = engine().analyze("junk.png", b"not an image").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage(_)));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(123.4567), 123.46);
        assert_eq!(round2(0.0), 0.0);
    }
}
