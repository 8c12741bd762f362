//! Quality report types.

use serde::{Deserialize, Serialize};

/// An undecoded image as handed over by the boundary.
///
/// Carries the original filename as an opaque pass-through string; the
/// engine never interprets it.
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Original filename of the upload or file.
    pub filename: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

impl RawImage {
    /// Creates a new raw image.
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Request outcome marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Analysis completed.
    Success,
    /// Analysis failed; see the error message.
    Error,
}

/// Ordered clarity classification derived from the blur score.
///
/// Ordering follows sharpness: `Blurry < Acceptable < Clear < VeryClear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Clarity {
    /// Below the blur threshold.
    Blurry,
    /// Above threshold but short of clearly sharp.
    Acceptable,
    /// Sharp image.
    Clear,
    /// Strong, high-variance edges throughout.
    #[serde(rename = "Very Clear")]
    VeryClear,
}

/// Immutable analysis result for a single image.
///
/// Created once per request, serialized immediately, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Original filename, passed through untouched.
    pub filename: String,
    /// Pixel-count adequacy in `[0, 100]`, saturating at the reference
    /// resolution.
    pub resolution_score: f64,
    /// Variance of the Laplacian edge response. Higher is sharper.
    pub blur_score: f64,
    /// True iff `blur_score` fell below the configured threshold.
    pub is_blurry: bool,
    /// Clarity band for `blur_score`.
    pub clarity: Clarity,
    /// Always [`Status::Success`] for a constructed report.
    pub status: Status,
}

/// Failure record produced by the boundary when analysis errors out.
///
/// Carries no numeric fields; a decode failure never yields a partial report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Original filename.
    pub filename: String,
    /// Always [`Status::Error`].
    pub status: Status,
    /// Human-readable error message.
    pub error: String,
}

impl ErrorReport {
    /// Creates an error record for the given file.
    #[must_use]
    pub fn new(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: Status::Error,
            error: error.into(),
        }
    }
}

/// A single output record, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisRecord {
    /// Successful analysis.
    Report(QualityReport),
    /// Failed analysis.
    Error(ErrorReport),
}

impl AnalysisRecord {
    /// Filename this record refers to.
    #[must_use]
    pub fn filename(&self) -> &str {
        match self {
            Self::Report(r) => &r.filename,
            Self::Error(e) => &e.filename,
        }
    }

    /// True if this record is a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
