//! Human-readable harvest summary

use crate::crawler::HarvestSummary;
use std::collections::BTreeMap;

/// Renders the summary as plain text
pub fn format_summary(summary: &HarvestSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Harvest Summary ===\n\n");

    if let Some(error) = &summary.root_error {
        out.push_str(&format!("Root page unavailable: {}\n\n", error));
    }

    out.push_str("Discovery:\n");
    out.push_str(&format!("  Sections found: {}\n", summary.sections));
    out.push_str(&format!(
        "  Category folders ready: {}\n",
        summary.categories_ready
    ));
    out.push_str(&format!("  Jobs queued: {}\n", summary.jobs_queued));
    if summary.jobs_skipped > 0 {
        out.push_str(&format!(
            "  Jobs skipped by keyword: {}\n",
            summary.jobs_skipped
        ));
    }
    out.push('\n');

    if !summary.category_failures.is_empty() {
        out.push_str("Category Folder Failures:\n");
        for (category, error) in &summary.category_failures {
            out.push_str(&format!("  - {}: {}\n", category, error));
        }
        out.push('\n');
    }

    if !summary.section_failures.is_empty() {
        out.push_str("Section Failures:\n");
        for failure in &summary.section_failures {
            out.push_str(&format!(
                "  - [{}] {} ({}): {}\n",
                failure.error.phase(),
                failure.section_url,
                failure.category,
                failure.error
            ));
        }
        out.push('\n');
    }

    if !summary.job_failures.is_empty() {
        let mut by_phase: BTreeMap<&str, usize> = BTreeMap::new();
        for failure in &summary.job_failures {
            *by_phase.entry(failure.error.phase()).or_default() += 1;
        }

        out.push_str("Job Failures by Phase:\n");
        for (phase, count) in &by_phase {
            out.push_str(&format!("  {}: {}\n", phase, count));
        }

        out.push_str("\nFailed Jobs:\n");
        for failure in &summary.job_failures {
            out.push_str(&format!("  - {}: {}\n", failure.job, failure.error));
        }
        out.push('\n');
    }

    let success_rate = if summary.jobs_queued > 0 {
        (summary.succeeded as f64 / summary.jobs_queued as f64) * 100.0
    } else {
        0.0
    };

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} jobs persisted) in {:.1}s\n",
        success_rate,
        summary.succeeded,
        summary.jobs_queued,
        summary.elapsed.as_secs_f64()
    ));

    out
}

/// Prints the summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    print!("{}", format_summary(summary));
}
