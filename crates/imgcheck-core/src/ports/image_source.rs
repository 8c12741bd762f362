//! Image source port for loading undecoded images.

use crate::domain::RawImage;

/// Port for producing images from a source.
///
/// Images are handed over undecoded; decoding (and decode failure) belongs
/// to the engine so it can short-circuit to a structured error.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if an image cannot be read.
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<RawImage>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
