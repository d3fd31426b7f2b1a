//! Output module for records and run reports
//!
//! This module handles:
//! - Writing the collected records as a JSON file
//! - Recording run counters and the walk's termination reason
//! - Printing the run summary and rendering the markdown report

mod json;
mod markdown;
pub mod stats;

pub use json::write_records;
pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{print_summary, RunSummary};
