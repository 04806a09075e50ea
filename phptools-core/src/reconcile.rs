//! Declared-vs-used reconciliation.
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │    declared.rs      │     │      usage.rs       │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  use statements +   │     │  regex rule battery │
//! │  sibling files      │     │                     │
//! └──────────┬──────────┘     └──────────┬──────────┘
//!            └───────────┬───────────────┘
//!                        ▼
//!            ┌─────────────────────┐
//!            │    reconcile.rs     │
//!            │  missing + unused   │
//!            └─────────────────────┘
//! ```
//!
//! Performance characteristics:
//! - Missing: O(|U|) hash lookups into the declared map
//! - Unused: O(|D| · |U|) scan, both sets being a handful of names per file

use serde::Serialize;

use crate::declared::{DeclaredSymbol, DeclaredSymbols};
use crate::usage::{UsedReference, UsedReferences};

/// Pseudo-types and keywords that look like class references but never need
/// a `use` statement.
pub const BUILTIN_NAMES: &[&str] = &[
    "string", "array", "integer", "boolean", "float", "static", "self", "parent",
];

/// Whether `first_segment` names a built-in.
pub fn is_builtin(first_segment: &str) -> bool {
    BUILTIN_NAMES.contains(&first_segment)
}

/// Outcome of one Check Declarations run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// First segments referenced without a declaration, in discovery order
    pub missing: Vec<String>,
    /// Full names declared but never referenced, in declaration order
    pub unused: Vec<String>,
}

impl CheckReport {
    /// Nothing missing and nothing unused.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unused.is_empty()
    }
}

/// Used references that can satisfy or require a declaration.
fn relevant(used: &UsedReferences) -> impl Iterator<Item = &UsedReference> {
    used.iter().filter(|u| !is_builtin(&u.first_segment))
}

fn is_symbol_used(symbol: &DeclaredSymbol, used: &UsedReferences) -> bool {
    relevant(used).any(|u| u.first_segment == symbol.short_name)
}

/// References with no declaration (explicit or dynamic) of their first segment.
pub fn find_missing(declared: &DeclaredSymbols, used: &UsedReferences) -> Vec<String> {
    relevant(used)
        .filter(|u| !declared.declares(&u.first_segment))
        .map(|u| u.first_segment.clone())
        .collect()
}

/// Explicit declarations never referenced. Dynamic ones are never reported.
pub fn find_unused(declared: &DeclaredSymbols, used: &UsedReferences) -> Vec<String> {
    declared
        .explicit()
        .filter(|s| !is_symbol_used(s, used))
        .map(|s| s.full_name.clone())
        .collect()
}

/// Computes both diagnostic lists. Never fails.
pub fn reconcile(declared: &DeclaredSymbols, used: &UsedReferences) -> CheckReport {
    CheckReport {
        missing: find_missing(declared, used),
        unused: find_unused(declared, used),
    }
}
