//! Output formatting - plaintext and JSON.

use std::path::Path;

use serde::Serialize;

use crate::reconcile::CheckReport;

/// Status line shown instead of a report when nothing is wrong.
pub const ALL_OK_STATUS: &str = "[PHP Check Use] All OK";

/// Indentation of report entries.
const ENTRY_MARGIN: usize = 4;

/// Renders the two-section text listing, or `None` for a clean report.
///
/// ```text
/// Missing uses:
///     Baz
///
/// Unused uses:
///     App\Unused
/// ```
pub fn render_plain(report: &CheckReport) -> Option<String> {
    if report.is_clean() {
        return None;
    }

    let mut out = String::new();
    let margin = " ".repeat(ENTRY_MARGIN);

    if !report.missing.is_empty() {
        out.push_str("Missing uses:\n");
        for name in &report.missing {
            out.push_str(&margin);
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');
    }

    if !report.unused.is_empty() {
        out.push_str("Unused uses:\n");
        for name in &report.unused {
            out.push_str(&margin);
            out.push_str(name);
            out.push('\n');
        }
    }

    Some(out)
}

/// JSON record for one checked file: `{"file", "missing", "unused"}`.
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub file: String,
    #[serde(flatten)]
    pub report: &'a CheckReport,
}

pub fn report_json<'a>(file: &Path, report: &'a CheckReport) -> FileReport<'a> {
    FileReport {
        file: file.display().to_string(),
        report,
    }
}

/// Prints a report in plain text format, or the all-clear status on stderr.
pub fn print_plain(report: &CheckReport) {
    match render_plain(report) {
        Some(text) => print!("{}", text),
        None => eprintln!("{}", ALL_OK_STATUS),
    }
}

/// Prints reports in JSON format.
///
/// Falls back to debug formatting if serialization fails.
pub fn print_json(reports: &[(&Path, &CheckReport)]) {
    let values: Vec<_> = reports
        .iter()
        .map(|(file, report)| report_json(file, report))
        .collect();

    match serde_json::to_string_pretty(&values) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::warn!(error = %e, "JSON serialization failed");
            println!("{:?}", reports);
        }
    }
}
