//! Output formatting module
//!
//! Renders collected outcomes as JSON event lines or a brief summary.

mod formatter;

pub use formatter::{EventFormatter, OutputFormat, DEFAULT_SOURCE};
