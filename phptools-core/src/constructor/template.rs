//! Constructor template resource.
//!
//! A template is plain text with three named placeholders:
//! `{{docblock}}`, `{{arguments}}` and `{{affectations}}`.

use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, PhptoolsError, PhptoolsResult};

/// Template shipped with the crate.
const BUILTIN_TEMPLATE: &str = include_str!("../../templates/constructor.tpl");

pub const DOCBLOCK_PLACEHOLDER: &str = "{{docblock}}";
pub const ARGUMENTS_PLACEHOLDER: &str = "{{arguments}}";
pub const AFFECTATIONS_PLACEHOLDER: &str = "{{affectations}}";

const PLACEHOLDERS: [&str; 3] = [
    DOCBLOCK_PLACEHOLDER,
    ARGUMENTS_PLACEHOLDER,
    AFFECTATIONS_PLACEHOLDER,
];

/// The three rendered fragments substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub docblock: String,
    pub arguments: String,
    pub affectations: String,
}

#[derive(Debug, Clone)]
pub struct Template {
    content: String,
}

impl Template {
    /// The default constructor template.
    pub fn builtin() -> Self {
        Self {
            content: BUILTIN_TEMPLATE.to_string(),
        }
    }

    /// Reads a template file. An unreadable file is fatal for the invocation.
    pub fn load(path: &Path) -> PhptoolsResult<Self> {
        tracing::debug!(path = %path.display(), "opening template");
        let content = fs::read_to_string(path).with_path(path)?;
        Self::from_string(content)
    }

    /// Wraps template text, rejecting text without any placeholder.
    pub fn from_string(content: impl Into<String>) -> PhptoolsResult<Self> {
        let content = content.into();
        if !PLACEHOLDERS.iter().any(|p| content.contains(p)) {
            return Err(PhptoolsError::template(format!(
                "template uses none of {}",
                PLACEHOLDERS.join(", ")
            )));
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Substitutes the fragments into the template.
    ///
    /// Placeholders are replaced in a single left-to-right pass, so fragment
    /// text that happens to contain a placeholder is left alone.
    pub fn render(&self, fragments: &Fragments) -> String {
        let mut out = String::with_capacity(self.content.len() + 256);
        let mut rest = self.content.as_str();

        while let Some((pos, placeholder)) = PLACEHOLDERS
            .iter()
            .filter_map(|p| rest.find(p).map(|pos| (pos, *p)))
            .min_by_key(|(pos, _)| *pos)
        {
            out.push_str(&rest[..pos]);
            out.push_str(match placeholder {
                DOCBLOCK_PLACEHOLDER => &fragments.docblock,
                ARGUMENTS_PLACEHOLDER => &fragments.arguments,
                _ => &fragments.affectations,
            });
            rest = &rest[pos + placeholder.len()..];
        }

        out.push_str(rest);
        out
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::builtin()
    }
}
