//! Output formatting for CLI.

mod json;
mod progress;

pub use json::{JsonMode, JsonOutput};
pub use progress::ProgressBar;
