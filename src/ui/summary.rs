//! End-of-pass and cleanup summaries printed to stdout
//!
//! The log file carries the per-entry record; these are one or two lines
//! for whoever is watching the terminal.

use crate::commands::cleanup::CleanupReport;
use crate::types::SyncReport;
use console::style;
use indicatif::{HumanBytes, HumanDuration};

pub fn print_pass_summary(report: &SyncReport) {
    let line = format_pass_summary(report);
    if report.is_clean() {
        println!("{} {}", style("✓").green(), line);
    } else {
        println!("{} {}", style("!").yellow().bold(), line);
    }
}

/// One-line summary of a finished pass
pub fn format_pass_summary(report: &SyncReport) -> String {
    if report.is_noop() && report.is_clean() {
        return format!(
            "Replica up to date ({} unchanged) in {}",
            report.unchanged,
            HumanDuration(report.duration)
        );
    }

    let mut line = format!(
        "Created: {}  Updated: {}  Unchanged: {}  Deleted: {}  Dirs created: {} | {} copied in {}",
        report.created,
        report.updated,
        report.unchanged,
        report.total_deletions(),
        report.created_dirs,
        HumanBytes(report.bytes_copied),
        HumanDuration(report.duration)
    );
    if report.errors > 0 {
        line.push_str(&format!(
            "\n  {} error(s); see the log file for details",
            report.errors
        ));
    }
    line
}

pub fn print_cleanup_summary(report: &CleanupReport) {
    println!("{} {}", style("✓").green(), format_cleanup_summary(report));
}

pub fn format_cleanup_summary(report: &CleanupReport) -> String {
    let mut lines = vec![format!(
        "Cleanup: removed {} replica entr{}",
        report.removed_entries,
        if report.removed_entries == 1 { "y" } else { "ies" }
    )];
    match (&report.removed_log_dir, report.removed_log_file) {
        (Some(dir), _) => lines.push(format!("  Removed log directory: {}", dir.display())),
        (None, true) => lines.push("  Removed log file".to_string()),
        (None, false) => {}
    }
    lines.join("\n")
}
