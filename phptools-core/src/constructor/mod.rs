//! Constructor generation from documented properties.
//!
//! # Example
//!
//! ```ignore
//! use phptools_core::constructor::{generate_constructor, Template};
//!
//! if let Some(code) = generate_constructor(&content, &Template::builtin()) {
//!     println!("{}", code);
//! }
//! ```
//!
//! For
//!
//! ```php
//! /**
//!  * The id.
//!  * @var int
//!  */
//! public $id;
//!
//! /**
//!  * @var ?string
//!  */
//! protected $label;
//! ```
//!
//! the builtin template yields
//!
//! ```php
//! /**
//!  * Class constructor.
//!  *
//!  * @param int     $id    The id.
//!  * @param ?string $label
//!  */
//! public function __construct(int $id, string $label = null)
//! {
//!     $this->id    = $id;
//!     $this->label = $label;
//! }
//! ```

pub mod property;
pub mod template;

pub use property::{extract_properties, Property, PropertyCollection};
pub use template::{Fragments, Template};

use crate::logging::log_info;

const DOCBLOCK_SEPARATOR: &str = "\n * ";
const ARGUMENT_SEPARATOR: &str = ", ";
const AFFECTATION_SEPARATOR: &str = "\n\t";

/// Renders the docblock, argument list and assignment fragments.
pub fn render_fragments(properties: &PropertyCollection) -> Fragments {
    let name_width = properties.name_width();
    let type_width = properties.type_width();

    let docblock: Vec<String> = properties
        .iter()
        .map(|p| format!("@param {}", p.to_param_annotation(name_width, type_width)))
        .collect();
    let arguments: Vec<String> = properties
        .iter()
        .map(Property::to_constructor_argument)
        .collect();
    let affectations: Vec<String> = properties
        .iter()
        .map(|p| format!("$this->{};", p.to_property_assign(name_width)))
        .collect();

    Fragments {
        docblock: docblock.join(DOCBLOCK_SEPARATOR),
        arguments: arguments.join(ARGUMENT_SEPARATOR),
        affectations: affectations.join(AFFECTATION_SEPARATOR),
    }
}

/// Generates a constructor for the properties of `content`, or `None` when
/// it declares no property.
pub fn generate_constructor(content: &str, template: &Template) -> Option<String> {
    let properties = extract_properties(content);
    if properties.is_empty() {
        log_info("No documented property found, nothing to generate");
        return None;
    }

    tracing::info!(properties = properties.len(), "generating constructor");
    Some(template.render(&render_fragments(&properties)))
}

/// Escapes `$` for snippet insertion, where it introduces tab stops.
pub fn escape_snippet(code: &str) -> String {
    code.replace('$', "\\$")
}
