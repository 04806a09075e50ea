//! Typed error handling for phptools.
//!
//! Every failure is local to one invocation: a check or a generation either
//! completes or returns one of these errors, never a partial result.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for phptools operations.
#[derive(Error, Debug)]
pub enum PhptoolsError {
    /// I/O error when reading a source file, a directory listing or a template
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Template resource is unusable
    #[error("Template error: {message}")]
    Template { message: String },

    /// The document is not PHP; the operation was refused
    #[error("Only available in a PHP file (syntax: {syntax})")]
    UnsupportedSyntax { syntax: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl PhptoolsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a template error.
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create a syntax refusal.
    pub fn unsupported_syntax(syntax: impl Into<String>) -> Self {
        Self::UnsupportedSyntax {
            syntax: syntax.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether this is a precondition refusal rather than a real failure.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::UnsupportedSyntax { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for phptools results.
pub type PhptoolsResult<T> = Result<T, PhptoolsError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> PhptoolsResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> PhptoolsResult<T> {
        self.map_err(|e| PhptoolsError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = PhptoolsError::io(
            PathBuf::from("/src/Controller.php"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, PhptoolsError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/src/Controller.php")));
        assert!(err.to_string().contains("/src/Controller.php"));
    }

    #[test]
    fn test_refusal() {
        assert!(PhptoolsError::unsupported_syntax("Packages/Rust/Rust.sublime-syntax").is_refusal());
        assert!(!PhptoolsError::template("missing placeholder").is_refusal());
    }

    #[test]
    fn test_unsupported_syntax_message() {
        let err = PhptoolsError::unsupported_syntax("markdown");
        assert_eq!(err.to_string(), "Only available in a PHP file (syntax: markdown)");
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let mapped = result.with_path("/missing/File.php");
        assert!(matches!(mapped, Err(PhptoolsError::Io { .. })));
    }
}
