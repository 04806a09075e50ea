//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use phptools_core::prelude::*;
//! ```

// Errors
pub use crate::error::{PhptoolsError, PhptoolsResult};

// Check Declarations
pub use crate::check::{check_file, check_source};
pub use crate::reconcile::CheckReport;
pub use crate::report::{render_plain, ALL_OK_STATUS};

// Generate Constructor
pub use crate::constructor::{escape_snippet, generate_constructor, Template};

// Syntax gate
pub use crate::syntax::{ensure_php_syntax, is_php_syntax};

// Configuration
pub use crate::config::{load_config, PhptoolsConfig};
