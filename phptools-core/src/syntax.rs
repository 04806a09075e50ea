//! Syntax gate: both operations only run on PHP documents.

use std::path::Path;

use crate::error::{PhptoolsError, PhptoolsResult};
use crate::logging::log_warn;

/// Extension of PHP source files, without the dot.
pub const PHP_EXTENSION: &str = "php";

/// Returns true when a syntax identifier names PHP.
///
/// Matches case-insensitively anywhere in the identifier, so editor syntax
/// paths (`Packages/PHP/PHP.sublime-syntax`), LSP language ids (`php`) and
/// scopes (`embedding.php`) all pass.
pub fn is_php_syntax(syntax: &str) -> bool {
    syntax.to_ascii_lowercase().contains(PHP_EXTENSION)
}

/// Refuses with [`PhptoolsError::UnsupportedSyntax`] unless `syntax` is PHP.
pub fn ensure_php_syntax(syntax: &str) -> PhptoolsResult<()> {
    if is_php_syntax(syntax) {
        Ok(())
    } else {
        let refusal = PhptoolsError::unsupported_syntax(syntax);
        log_warn(&refusal.to_string());
        Err(refusal)
    }
}

/// Derives a syntax identifier from a file path: its extension, or the empty
/// string when it has none.
pub fn syntax_from_path(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_default()
}
