//! Custom element name validation
//!
//! Names must be valid custom element names: they are used verbatim as the
//! tag name, the project directory and part of several file names.

use anyhow::Result;
use async_trait::async_trait;

const NAMING_ARTICLE: &str = "http://webcomponents.github.io/articles/how-should-i-name-my-element";
const SPEC_LINK: &str =
    "https://html.spec.whatwg.org/multipage/scripting.html#valid-custom-element-name";

/// Names reserved by SVG and MathML
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Prefixes that are legal but discouraged
const DISCOURAGED_PREFIXES: &[&str] = &["polymer-", "x-", "ng-", "unicorn-"];

/// Outcome of validating a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    /// Reason for rejection, or an advisory when the name is valid
    pub message: Option<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn warned(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

/// Checks an element name before anything touches the filesystem
#[async_trait]
pub trait NameValidator: Send + Sync {
    async fn validate(&self, name: &str) -> Result<Validation>;
}

/// Validator implementing the custom element naming rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementNameValidator;

#[async_trait]
impl NameValidator for ElementNameValidator {
    async fn validate(&self, name: &str) -> Result<Validation> {
        Ok(validate_element_name(name))
    }
}

/// Validate a name against the custom element rules
pub fn validate_element_name(name: &str) -> Validation {
    if name.is_empty() {
        return Validation::rejected("Missing element name.");
    }

    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Validation::rejected(
            "Custom element names must not contain uppercase ASCII characters.",
        );
    }

    if !name.contains('-') {
        return Validation::rejected(
            "Custom element names must contain a hyphen. Example: unicorn-cake",
        );
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Validation::rejected("Custom element names must not start with a digit.");
    }

    if name.starts_with('-') {
        return Validation::rejected("Custom element names must not start with a hyphen.");
    }

    if !is_potential_custom_element_name(name) {
        return Validation::rejected(format!("Invalid element name.\nSee: {}", SPEC_LINK));
    }

    if RESERVED_NAMES.contains(&name) {
        return Validation::rejected(format!(
            "The supplied element name is reserved and can't be used.\nSee: {}",
            SPEC_LINK
        ));
    }

    match advisory(name) {
        Some(message) => Validation::warned(message),
        None => Validation::valid(),
    }
}

fn advisory(name: &str) -> Option<String> {
    if let Some(prefix) = DISCOURAGED_PREFIXES.iter().find(|p| name.starts_with(*p)) {
        return Some(format!(
            "Custom element names should not start with `{}`.\nSee: {}",
            prefix, NAMING_ARTICLE
        ));
    }

    if name.starts_with("xml") {
        return Some("Custom element names should not start with `xml`.".to_string());
    }

    if name.ends_with('-') {
        return Some("Custom element names should not end with a hyphen.".to_string());
    }

    if name.contains("--") {
        return Some("Custom element names should not contain consecutive hyphens.".to_string());
    }

    if !name.is_ascii() {
        return Some("Custom element names should not contain non-ASCII characters.".to_string());
    }

    None
}

/// `[a-z] (PCENChar)* '-' (PCENChar)*`
fn is_potential_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(is_pcen_char)
}

fn is_pcen_char(c: char) -> bool {
    matches!(c,
        '-' | '.' | '0'..='9' | '_' | 'a'..='z'
        | '\u{B7}'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{203F}'..='\u{2040}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}
