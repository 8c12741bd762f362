//! Test support utilities for imgcheck.
//!
//! Provides synthetic image builders (including encoded-bytes helpers, since
//! the engine consumes raw bytes) and mock implementations of the core port
//! traits.
//!
//! # Example
//!
//! ```
//! use imgcheck_test_support::SyntheticImage;
//!
//! // A flat gray PNG decodes to blur score 0.
//! let bytes = SyntheticImage::flat_png(100, 100, 128);
//! assert!(!bytes.is_empty());
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImage;
pub use mocks::{
    ConstantMaskModel, FailingModel, MismatchedMaskModel, MockImageSource, MockProgressSink,
    MockResultOutput,
};
