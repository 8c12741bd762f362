//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imgcheck_core::domain::{AnalysisRecord, RawImage};
use imgcheck_core::ports::{
    BackgroundModel, ImageSource, ProgressEvent, ProgressSink, ResultOutput,
};

/// Mock [`ImageSource`] yielding pre-built raw images.
pub struct MockImageSource {
    images: Vec<RawImage>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<RawImage>) -> Self {
        Self {
            images,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<RawImage>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.images.iter().cloned().map(Ok))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.images.len())
    }
}

/// Mock [`ResultOutput`] capturing records for assertions.
#[derive(Default)]
pub struct MockResultOutput {
    records: Arc<Mutex<Vec<AnalysisRecord>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &AnalysisRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock [`ProgressSink`] capturing events for assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { analyzed, failed } => Some((*analyzed, *failed)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Stub [`BackgroundModel`] returning a constant-valued mask.
///
/// Decouples removal adapter tests from real segmentation weights.
pub struct ConstantMaskModel {
    value: u8,
}

impl ConstantMaskModel {
    /// Creates a stub producing masks filled with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    /// Stub treating everything as foreground.
    #[must_use]
    pub const fn opaque() -> Self {
        Self::new(255)
    }

    /// Stub treating everything as background.
    #[must_use]
    pub const fn transparent() -> Self {
        Self::new(0)
    }
}

impl BackgroundModel for ConstantMaskModel {
    fn name(&self) -> &'static str {
        "constant-mask"
    }

    fn predict_mask(&self, image: &DynamicImage) -> anyhow::Result<GrayImage> {
        let (width, height) = image.dimensions();
        Ok(GrayImage::from_fn(width, height, |_, _| Luma([self.value])))
    }
}

/// Stub [`BackgroundModel`] whose mask never matches the input dimensions,
/// for exercising the adapter's dimension check.
pub struct MismatchedMaskModel;

impl BackgroundModel for MismatchedMaskModel {
    fn name(&self) -> &'static str {
        "mismatched-mask"
    }

    fn predict_mask(&self, image: &DynamicImage) -> anyhow::Result<GrayImage> {
        let (width, height) = image.dimensions();
        Ok(GrayImage::from_pixel(width + 1, height, Luma([255])))
    }
}

/// Stub [`BackgroundModel`] that always fails, for error-path tests.
pub struct FailingModel;

impl BackgroundModel for FailingModel {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn predict_mask(&self, _image: &DynamicImage) -> anyhow::Result<GrayImage> {
        anyhow::bail!("model exploded")
    }
}
