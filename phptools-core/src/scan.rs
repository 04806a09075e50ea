//! Sibling file discovery for dynamic declarations.
//!
//! A PHP class may reference classes of the same namespace without a `use`
//! statement; those usually live next to it on disk. Every `.php` file in the
//! containing directory is therefore treated as an implicit declaration.
//! Only the directory itself is listed, never its subdirectories.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PhptoolsError, PhptoolsResult};
use crate::syntax::PHP_EXTENSION;

/// Lists the regular `.php` files directly inside `dir`, sorted by path.
pub fn gather_php_siblings(dir: &Path) -> PhptoolsResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            // Broken symlinks and unreadable siblings are simply not files.
            Err(e) if e.depth() > 0 => {
                tracing::debug!(error = %e, "skipping unreadable sibling");
                continue;
            }
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                return Err(match e.into_io_error() {
                    Some(io) => PhptoolsError::io(path, io),
                    None => PhptoolsError::invalid_argument(format!(
                        "Failed to list {}",
                        path.display()
                    )),
                });
            }
        };

        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == PHP_EXTENSION)
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Basenames (without extension) of the `.php` files directly inside `dir`.
pub fn sibling_symbols(dir: &Path) -> PhptoolsResult<Vec<String>> {
    let names = gather_php_siblings(dir)?
        .iter()
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
        .collect::<Vec<_>>();

    tracing::debug!(dir = %dir.display(), count = names.len(), "sibling symbols");
    Ok(names)
}
