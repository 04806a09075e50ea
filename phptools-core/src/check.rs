//! The Check Declarations operation.

use std::fs;
use std::path::Path;

use crate::declared::extract_declarations;
use crate::error::{IoResultExt, PhptoolsResult};
use crate::reconcile::{reconcile, CheckReport};
use crate::usage::extract_usages;

/// Checks in-memory `content` whose file lives in `dir`.
pub fn check_source(content: &str, dir: &Path) -> PhptoolsResult<CheckReport> {
    let declared = extract_declarations(content, dir)?;
    let used = extract_usages(content);
    let report = reconcile(&declared, &used);

    tracing::info!(
        declared = declared.len(),
        used = used.len(),
        missing = report.missing.len(),
        unused = report.unused.len(),
        "check complete"
    );
    Ok(report)
}

/// Reads `path` and checks it against its own directory.
pub fn check_file(path: &Path) -> PhptoolsResult<CheckReport> {
    let content = fs::read_to_string(path).with_path(path)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    check_source(&content, dir)
}
