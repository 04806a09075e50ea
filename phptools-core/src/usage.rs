//! Usage extraction: names a PHP file references.
//!
//! There is no parser behind this. A fixed battery of regex rules runs over the
//! whole text, each independently:
//!
//! | rule            | example                          |
//! |-----------------|----------------------------------|
//! | instantiation   | `new Foo\Bar()`                  |
//! | typed parameter | `(Request $request, Baz $z)`     |
//! | static access   | `Tools::slugify()`               |
//! | inheritance     | `class X extends Y`              |
//! | interface list  | `implements A, B`                |
//! | annotation      | `@ORM\Entity(...)`               |
//!
//! Matches overlap freely; the resulting [`UsedReferences`] keeps the first
//! reference per first segment. Names starting with `\` are fully qualified
//! and never need a `use` statement, so rules drop them.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::declared::NS_SEPARATOR;

/// A name observed at a usage site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsedReference {
    /// Name as captured
    pub full_name: String,
    /// Text before the first namespace separator
    pub first_segment: String,
}

impl UsedReference {
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let first_segment = full_name
            .split(NS_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            full_name,
            first_segment,
        }
    }
}

/// Used references keyed by first segment, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct UsedReferences {
    references: IndexMap<String, UsedReference>,
}

impl UsedReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `reference` unless its first segment was already seen.
    pub fn insert(&mut self, reference: UsedReference) -> bool {
        if self.references.contains_key(&reference.first_segment) {
            return false;
        }
        self.references
            .insert(reference.first_segment.clone(), reference);
        true
    }

    pub fn get(&self, first_segment: &str) -> Option<&UsedReference> {
        self.references.get(first_segment)
    }

    /// All stored references, built-ins included.
    pub fn iter(&self) -> impl Iterator<Item = &UsedReference> {
        self.references.values()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// One usage-site pattern.
pub trait UsageRule: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Captured names, in text order.
    fn extract(&self, content: &str) -> Vec<String>;
}

fn is_fully_qualified(name: &str) -> bool {
    name.starts_with(NS_SEPARATOR)
}

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static REGEX: OnceLock<Regex> = OnceLock::new();
            REGEX.get_or_init(|| Regex::new($pattern).expect("Hardcoded regex pattern is valid"))
        }
    };
}

static_regex!(instantiation_regex, r"\bnew\s+([^(;\s]+)");
static_regex!(
    typed_parameter_regex,
    r"(?:\(|,)\s*([a-zA-Z_\\][a-zA-Z0-9_\\]*)\s+\$"
);
static_regex!(static_access_regex, r"([a-zA-Z_\\][a-zA-Z0-9_\\]*)::");
static_regex!(
    inheritance_regex,
    r"\b(?:class|interface)\s(?:[a-zA-Z0-9_]+)\sextends\s([^\s,{]+)"
);
static_regex!(interface_list_regex, r"\bimplements\s([^{]+)");
static_regex!(annotation_regex, r"@([a-zA-Z_\\][a-zA-Z0-9_\\]*)");

/// Collects capture group 1 of every match, skipping fully qualified names.
fn captures(regex: &Regex, content: &str) -> Vec<String> {
    regex
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .filter(|name| !is_fully_qualified(name))
        .collect()
}

/// `new Foo()`, `new Foo\Bar;`
pub struct InstantiationRule;

impl UsageRule for InstantiationRule {
    fn name(&self) -> &'static str {
        "instantiation"
    }

    fn extract(&self, content: &str) -> Vec<String> {
        captures(instantiation_regex(), content)
    }
}

/// `function f(Request $request, Baz\Bar $z)`
pub struct TypedParameterRule;

impl UsageRule for TypedParameterRule {
    fn name(&self) -> &'static str {
        "typed-parameter"
    }

    fn extract(&self, content: &str) -> Vec<String> {
        captures(typed_parameter_regex(), content)
    }
}

/// `Tools::slugify()`, `Status::ACTIVE`
pub struct StaticAccessRule;

impl UsageRule for StaticAccessRule {
    fn name(&self) -> &'static str {
        "static-access"
    }

    fn extract(&self, content: &str) -> Vec<String> {
        captures(static_access_regex(), content)
    }
}

/// `class Child extends Parent`, `interface A extends B`
pub struct InheritanceRule;

impl UsageRule for InheritanceRule {
    fn name(&self) -> &'static str {
        "inheritance"
    }

    fn extract(&self, content: &str) -> Vec<String> {
        captures(inheritance_regex(), content)
    }
}

/// `implements Countable, Foo\Bar`
pub struct InterfaceListRule;

impl UsageRule for InterfaceListRule {
    fn name(&self) -> &'static str {
        "interface-list"
    }

    fn extract(&self, content: &str) -> Vec<String> {
        interface_list_regex()
            .captures_iter(content)
            .flat_map(|cap| {
                cap[1]
                    .split(',')
                    .map(|entry| entry.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|name| !name.is_empty() && !is_fully_qualified(name))
            .collect()
    }
}

/// `@Route("/")`, `@ORM\Entity` at the end of a docblock line.
pub struct AnnotationRule;

impl UsageRule for AnnotationRule {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn extract(&self, content: &str) -> Vec<String> {
        let bytes = content.as_bytes();
        annotation_regex()
            .captures_iter(content)
            .filter_map(|cap| {
                let at = cap.get(0)?;
                let name = cap.get(1)?;
                // Delimiters are checked by hand so adjacent annotations never share one.
                if at.start() > 0 && bytes[at.start() - 1] == b'\\' {
                    return None;
                }
                let rest = &content[name.end()..];
                let closed = rest.starts_with('(') || rest.starts_with('\n') || rest.starts_with("\r\n");
                closed.then(|| name.as_str().to_string())
            })
            .filter(|name| !is_fully_qualified(name))
            .collect()
    }
}

/// The standard rule battery, in evaluation order.
pub fn default_rules() -> Vec<Box<dyn UsageRule>> {
    vec![
        Box::new(InstantiationRule),
        Box::new(TypedParameterRule),
        Box::new(StaticAccessRule),
        Box::new(InheritanceRule),
        Box::new(InterfaceListRule),
        Box::new(AnnotationRule),
    ]
}

/// Runs `rules` in order over `content` and merges their references.
pub fn extract_usages_with(rules: &[Box<dyn UsageRule>], content: &str) -> UsedReferences {
    let mut used = UsedReferences::new();

    for rule in rules {
        let names = rule.extract(content);
        tracing::debug!(rule = rule.name(), matches = names.len(), "usage rule");
        for name in names {
            used.insert(UsedReference::new(name));
        }
    }

    used
}

/// Runs the standard rule battery over `content`.
pub fn extract_usages(content: &str) -> UsedReferences {
    extract_usages_with(&default_rules(), content)
}
