//! Imgcheck Core - Image quality analysis engine and domain types.
//!
//! This crate contains the domain types, the quality analysis engine
//! (resolution scoring, blur detection, clarity classification), the port
//! traits for adapters, and the candle-based segmentation model used for
//! background removal.

pub mod domain;
pub mod engine;
pub mod inference;
pub mod ports;

pub use domain::{
    AnalysisError, AnalysisRecord, Clarity, ErrorReport, QualityReport, RawImage, RemovalError,
    Status,
};
pub use engine::{QualityConfig, QualityEngine};
pub use ports::{BackgroundModel, ImageSource, ProgressEvent, ProgressSink, ResultOutput};
