//! Output module for end-of-run reporting
//!
//! The run writes no manifest file; the summary is printed to stdout and
//! every failure has already been logged where it happened.

mod summary;

pub use summary::{format_summary, print_summary};
