//! Core domain types for image quality analysis.

mod error;
mod report;

pub use error::{AnalysisError, RemovalError};
pub use report::{AnalysisRecord, Clarity, ErrorReport, QualityReport, RawImage, Status};
