//! Declaration extraction: what a PHP file makes available by name.
//!
//! Two sources:
//! - explicit `use` statements (`use Foo\Bar, Baz\Qux as Q;`)
//! - sibling `.php` files in the same directory (dynamic declarations)

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::PhptoolsResult;
use crate::scan::sibling_symbols;

/// Namespace separator.
pub const NS_SEPARATOR: char = '\\';

/// A name made available for unqualified reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSymbol {
    /// Name as written in the `use` statement (or the alias / file basename)
    pub full_name: String,
    /// Last namespace segment, compared against used references
    pub short_name: String,
    /// Inferred from a sibling file rather than declared
    pub dynamic: bool,
}

impl DeclaredSymbol {
    pub fn new(full_name: impl Into<String>, dynamic: bool) -> Self {
        let full_name = full_name.into();
        let short_name = full_name
            .rsplit(NS_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            full_name,
            short_name,
            dynamic,
        }
    }
}

/// Declared symbols keyed by short name, in declaration order.
///
/// The first declaration of a short name wins; later ones are dropped.
#[derive(Debug, Clone, Default)]
pub struct DeclaredSymbols {
    symbols: IndexMap<String, DeclaredSymbol>,
}

impl DeclaredSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `symbol` unless its short name is already declared.
    /// Returns whether it was inserted.
    pub fn insert(&mut self, symbol: DeclaredSymbol) -> bool {
        if self.symbols.contains_key(&symbol.short_name) {
            return false;
        }
        self.symbols.insert(symbol.short_name.clone(), symbol);
        true
    }

    /// Whether any symbol, dynamic or not, is declared under `short_name`.
    pub fn declares(&self, short_name: &str) -> bool {
        self.symbols.contains_key(short_name)
    }

    pub fn get(&self, short_name: &str) -> Option<&DeclaredSymbol> {
        self.symbols.get(short_name)
    }

    /// All symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DeclaredSymbol> {
        self.symbols.values()
    }

    /// Explicitly declared symbols, the only candidates for the unused report.
    pub fn explicit(&self) -> impl Iterator<Item = &DeclaredSymbol> {
        self.symbols.values().filter(|s| !s.dynamic)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn use_statement_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: hardcoded pattern.
    REGEX.get_or_init(|| {
        Regex::new(r"\buse\s([a-zA-Z0-9\\\s,_]+);").expect("Hardcoded regex pattern is valid")
    })
}

fn alias_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\sas(?:\s|$)").expect("Hardcoded regex pattern is valid"))
}

/// Resolves one entry of a `use` list to the name it declares.
///
/// `Foo\Bar as Baz` declares `Baz`; `Foo\Bar` declares itself. An alias with
/// nothing on its right (`Foo\Bar as`) falls back to the left-hand side.
fn declared_name(entry: &str) -> &str {
    if let Some(m) = alias_regex().find(entry) {
        let alias = entry[m.end()..].trim();
        if !alias.is_empty() {
            return alias;
        }
        return entry[..m.start()].trim();
    }
    entry
}

/// Extracts the explicit `use` declarations of `content`.
pub fn extract_declared(content: &str) -> DeclaredSymbols {
    let mut declared = DeclaredSymbols::new();

    for cap in use_statement_regex().captures_iter(content) {
        for entry in cap[1].split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            declared.insert(DeclaredSymbol::new(declared_name(entry), false));
        }
    }

    declared
}

/// Byte ranges of the `use` statements of `content`, in text order.
pub fn use_statement_spans(content: &str) -> Vec<Range<usize>> {
    use_statement_regex()
        .find_iter(content)
        .map(|m| m.range())
        .collect()
}

/// Extracts explicit declarations from `content`, then adds every sibling
/// `.php` file of `dir` as a dynamic declaration.
pub fn extract_declarations(content: &str, dir: &Path) -> PhptoolsResult<DeclaredSymbols> {
    let mut declared = extract_declared(content);
    let explicit = declared.len();

    for name in sibling_symbols(dir)? {
        declared.insert(DeclaredSymbol::new(name, true));
    }

    tracing::debug!(
        explicit,
        dynamic = declared.len() - explicit,
        "declarations extracted"
    );
    Ok(declared)
}
