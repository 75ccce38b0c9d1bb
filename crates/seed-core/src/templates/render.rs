//! Template expansion
//!
//! Placeholders use the `<%= name %>` form so they never collide with
//! Polymer's `{{binding}}` syntax inside the templates themselves.

use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Variables available to a template
pub type Bindings = BTreeMap<&'static str, String>;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"<%=\s*([A-Za-z_][A-Za-z0-9_]*)\s*%>").expect("placeholder pattern is valid")
    })
}

/// Substitute every placeholder in `text`; an unbound name is an error
pub fn interpolate(text: &str, bindings: &Bindings) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for caps in placeholder().captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = bindings
            .get(name.as_str())
            .ok_or_else(|| anyhow::anyhow!("Template variable '{}' is not bound", name.as_str()))?;

        output.push_str(&text[last..whole.start()]);
        output.push_str(value);
        last = whole.end();
    }

    output.push_str(&text[last..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings() -> Bindings {
        Bindings::from([
            ("elementName", "super-element".to_string()),
            ("githubUser", "alice".to_string()),
        ])
    }

    #[test]
    fn test_substitutes_every_occurrence() {
        let out = interpolate(
            "<<%= elementName %>></<%=elementName%>> by <%= githubUser %>",
            &bindings(),
        )
        .unwrap();
        assert_eq!(out, "<super-element></super-element> by alice");
    }

    #[test]
    fn test_leaves_polymer_bindings_alone() {
        let out = interpolate("<b>{{author.name}}</b>", &bindings()).unwrap();
        assert_eq!(out, "<b>{{author.name}}</b>");
    }

    #[test]
    fn test_unbound_variable_is_an_error() {
        let err = interpolate("<%= nope %>", &bindings()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let b = Bindings::from([("githubUser", String::new())]);
        assert_eq!(interpolate("by <%= githubUser %>.", &b).unwrap(), "by .");
    }
}
