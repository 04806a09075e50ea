//! phptools-core: regex-driven PHP use-statement checker and constructor
//! generator.
//!
//! Both features work on raw file text. There is no PHP parser: a fixed set of
//! patterns approximates what a file declares and what it references.
//!
//! # Features
//!
//! - **Check declarations**: report referenced names without a `use`
//!   statement ("missing") and `use` statements never referenced ("unused")
//! - **Generate constructor**: build a constructor from the documented
//!   properties of a class
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use phptools_core::prelude::*;
//!
//! let report = check_file(Path::new("src/Controller/UserController.php"))?;
//! if let Some(text) = render_plain(&report) {
//!     print!("{}", text);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`declared`]: `use` statements and sibling-file declarations
//! - [`usage`]: the usage rule battery
//! - [`reconcile`]: declared-vs-used comparison
//! - [`check`]: the Check Declarations operation
//! - [`constructor`]: property extraction and constructor rendering
//! - [`report`]: plain and JSON output
//! - [`syntax`]: the PHP syntax gate
//! - [`scan`]: sibling file listing
//! - [`config`]: phptools.toml loading
//! - [`error`]: typed error handling

pub mod check;
pub mod config;
pub mod constructor;
pub mod declared;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod reconcile;
pub mod report;
pub mod scan;
pub mod syntax;
pub mod usage;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{IoResultExt, PhptoolsError, PhptoolsResult};

// Operations
pub use check::{check_file, check_source};
pub use constructor::{
    escape_snippet, extract_properties, generate_constructor, render_fragments, Fragments,
    Property, PropertyCollection, Template,
};

// Configuration
pub use config::{load_config, ConstructorConfig, OutputConfig, PhptoolsConfig, CONFIG_FILE_NAME};

// Extraction
pub use declared::{
    extract_declarations, extract_declared, use_statement_spans, DeclaredSymbol, DeclaredSymbols,
};
pub use usage::{
    default_rules, extract_usages, extract_usages_with, UsageRule, UsedReference, UsedReferences,
};

// Reconciliation
pub use reconcile::{find_missing, find_unused, is_builtin, reconcile, CheckReport, BUILTIN_NAMES};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{
    print_json, print_plain, render_plain, report_json, FileReport, ALL_OK_STATUS,
};

// Syntax gate
pub use syntax::{ensure_php_syntax, is_php_syntax, syntax_from_path};

// Sibling scan
pub use scan::{gather_php_siblings, sibling_symbols};

#[cfg(test)]
mod tests;
