//! Output module for presenting scan results
//!
//! This module handles rendering the per-prefix totals of a finished scan
//! as a plain-text table on stdout.

mod summary;

pub use summary::{print_summary, render_summary};
