//! Error taxonomy for analysis and background removal.
//!
//! All variants are terminal for a request: the operations are pure
//! functions of their input, so a retry would reproduce the failure.

use thiserror::Error;

/// Errors from the quality analysis engine.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input bytes do not decode to a valid, non-empty pixel grid.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Decoded pixel count exceeds the configured safety ceiling.
    #[error("image too large: {pixels} pixels exceeds ceiling of {limit}")]
    TooLarge {
        /// Decoded pixel count.
        pixels: u64,
        /// Configured ceiling.
        limit: u64,
    },
}

/// Errors from the background removal adapter.
#[derive(Debug, Error)]
pub enum RemovalError {
    /// Input bytes do not decode to a valid image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The opaque segmentation model failed; not retried.
    #[error("background removal failed: {0}")]
    ModelFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_messages() {
        let err = AnalysisError::InvalidImage("truncated PNG".into());
        assert_eq!(err.to_string(), "invalid image: truncated PNG");

        let err = AnalysisError::TooLarge {
            pixels: 100_000_000,
            limit: 64_000_000,
        };
        assert!(err.to_string().contains("100000000"));
        assert!(err.to_string().contains("64000000"));
    }

    #[test]
    fn test_removal_error_messages() {
        let err = RemovalError::ModelFailure("mask shape mismatch".into());
        assert!(err.to_string().starts_with("background removal failed"));
    }
}
