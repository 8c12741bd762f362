//! Progress reporting port for UI integration.

use crate::domain::AnalysisRecord;

/// Events emitted during batch analysis.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Analysis started for an image.
    Started {
        /// Filename of the image.
        filename: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// A record was produced for an image (success or error).
    Completed {
        /// The produced record.
        record: AnalysisRecord,
    },
    /// All images have been processed.
    Finished {
        /// Records with a successful report.
        analyzed: usize,
        /// Records carrying an error.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
