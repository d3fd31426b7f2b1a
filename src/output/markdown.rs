//! Markdown run report generation
//!
//! This module renders a run summary as a human-readable markdown report:
//! search parameters, page walk outcome and record counters.

use crate::output::RunSummary;
use crate::ScrapeError;
use std::fs;
use std::path::Path;

/// Writes a markdown report of a run
///
/// # Arguments
///
/// * `summary` - The finished run summary
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(ScrapeError::Write)` - Failed to write the report
pub fn write_markdown_report(summary: &RunSummary, output_path: &Path) -> Result<(), ScrapeError> {
    let markdown = format_markdown_report(summary);
    let write_error = |source| ScrapeError::Write {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(output_path, markdown).map_err(write_error)?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_report(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# wlw-scraper Run Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Query**: {}\n", summary.query));
    md.push_str(&format!("- **Mode**: {}\n", summary.mode));
    md.push_str(&format!("- **Region**: {}\n", summary.region));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    if let Some(path) = &summary.output_path {
        md.push_str(&format!("- **Output**: {}\n", path.display()));
    }
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Page Walk\n\n");
    md.push_str(&format!("- **Pages Fetched**: {}\n", summary.pages_fetched));
    match &summary.termination {
        Some(termination) => {
            md.push_str(&format!(
                "- **Stopped**: {} ({})\n",
                termination.as_str(),
                termination
            ));
        }
        None => md.push_str("- **Stopped**: not started\n"),
    }
    if summary.is_partial() {
        md.push_str("- **Result**: partial\n");
    }
    md.push('\n');

    md.push_str("## Records\n\n");
    md.push_str("| Counter | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Listings seen | {} |\n", summary.listings_seen));
    md.push_str(&format!("| Records collected | {} |\n", summary.records_collected));
    md.push_str(&format!("| Skipped (malformed) | {} |\n", summary.malformed_skipped));
    md.push_str(&format!("| Duplicates dropped | {} |\n", summary.duplicates_dropped));
    md.push_str(&format!("| Profile fetches | {} |\n", summary.detail_fetches));
    md.push_str(&format!("| Profile failures | {} |\n", summary.detail_failures));

    md
}
