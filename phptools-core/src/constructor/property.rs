//! Documented property extraction.
//!
//! A property is picked up when a visibility-qualified declaration
//! (`public|protected|private|var $name`) starts a line. The documentation
//! block directly above it, if any, supplies the first-line description and
//! the `@var` type:
//!
//! ```php
//! /**
//!  * The id.
//!  * @var int
//!  */
//! public $id;
//! ```
//!
//! Only a block whose every line starts with `*` counts as "directly above":
//! a block separated from the declaration by another block is ignored.

use std::sync::OnceLock;

use regex::Regex;

/// Marker of a nullable type (`?string`).
pub const NULLABLE_MARKER: char = '?';

fn property_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: hardcoded pattern.
    REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)",
            r"(?:/\*\*\n",
            r"(?:\s*\*\s+([^\n]+)\n)?",
            r"(?:\s*\*[^\n]*?\n)*",
            r"\s*\*\s+@var\s+(\S+)(?:\s[^\n]*)?\n",
            r"(?:\s*\*[^\n]*?\n)*",
            r"\s*\*/)?",
            r"\n\s*(?:public|protected|private|var)\s+\$([^=;\s]+)",
        ))
        .expect("Hardcoded regex pattern is valid")
    })
}

/// A class property with its documented type and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    /// `@var` type, possibly `?`-prefixed, empty when undocumented
    pub type_name: String,
    /// First docblock line, empty when absent
    pub description: String,
}

impl Property {
    pub fn new(
        name: impl Into<String>,
        type_name: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.unwrap_or_default().to_string(),
            description: description.unwrap_or_default().trim_end().to_string(),
        }
    }

    /// `<type><pad>$<name><pad><description>`, aligned on the widest type and
    /// name of the collection.
    pub fn to_param_annotation(&self, name_width: usize, type_width: usize) -> String {
        let tpad = (1 + type_width).saturating_sub(self.type_name.len());
        let npad = (1 + name_width).saturating_sub(self.name.len());
        format!(
            "{}{}${}{}{}",
            self.type_name,
            " ".repeat(tpad),
            self.name,
            " ".repeat(npad),
            self.description
        )
    }

    /// Constructor parameter: `$id`, `int $id`, or `string $name = null` for
    /// `?string`.
    pub fn to_constructor_argument(&self) -> String {
        if self.type_name.is_empty() {
            return format!("${}", self.name);
        }
        match self.type_name.strip_prefix(NULLABLE_MARKER) {
            Some(inner) => format!("{} ${} = null", inner, self.name),
            None => format!("{} ${}", self.type_name, self.name),
        }
    }

    /// `<name><pad>= $<name>`, aligned on the widest name.
    pub fn to_property_assign(&self, name_width: usize) -> String {
        let npad = (1 + name_width).saturating_sub(self.name.len());
        format!("{}{}= ${}", self.name, " ".repeat(npad), self.name)
    }
}

/// Properties in file order, with the widths used for alignment.
#[derive(Debug, Clone, Default)]
pub struct PropertyCollection {
    properties: Vec<Property>,
    name_width: usize,
    type_width: usize,
}

impl PropertyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: Property) {
        self.name_width = self.name_width.max(property.name.len());
        self.type_width = self.type_width.max(property.type_name.len());
        self.properties.push(property);
    }

    pub fn name_width(&self) -> usize {
        self.name_width
    }

    pub fn type_width(&self) -> usize {
        self.type_width
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Extracts every property declaration of `content`, in file order.
pub fn extract_properties(content: &str) -> PropertyCollection {
    let mut properties = PropertyCollection::new();

    for cap in property_regex().captures_iter(content) {
        let name = &cap[3];
        properties.push(Property::new(
            name,
            cap.get(2).map(|m| m.as_str()),
            cap.get(1).map(|m| m.as_str()),
        ));
    }

    tracing::debug!(count = properties.len(), "properties extracted");
    properties
}
