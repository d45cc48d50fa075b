//! Plain-text placeholder substitution.
//!
//! Generation runs two pure passes, each returning a new string:
//!
//! 1. `substitute_scalars` replaces every `{key}` whose top-level value is a
//!    string, number or boolean.
//! 2. `substitute_nested_paths` replaces every `{prefix[a.b]suffix}` with the
//!    value found by walking `a.b`, or with nothing when the walk fails.
//!
//! Generation never fails on missing data.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

use super::common::{display_value, entries, is_composite, is_truthy, lookup};
use super::traits::TemplateEngine;
use super::GeneratorError;

lazy_static! {
    static ref NESTED_PLACEHOLDER: Regex =
        Regex::new(r"\{([^{}]+?\[[^{}]+?\][^{}]*?)\}").expect("nested placeholder pattern");
    static ref BRACKET_PATH: Regex = Regex::new(r"\[(.*?)\]").expect("bracket path pattern");
}

/// Pass 1: replace `{key}` for every scalar top-level entry, all occurrences.
///
/// Keys are matched literally. Composite values leave their `{key}` untouched.
pub fn substitute_scalars(template: &str, data: &Value) -> String {
    let mut document = template.to_string();
    for (key, value) in entries(data) {
        if is_composite(value) {
            continue;
        }
        let placeholder = format!("{{{key}}}");
        document = document.replace(&placeholder, &display_value(value));
    }
    document
}

/// Pass 2: replace bracketed path placeholders.
pub fn substitute_nested_paths(document: &str, data: &Value) -> String {
    NESTED_PLACEHOLDER
        .replace_all(document, |caps: &Captures| {
            resolve_bracket_path(&caps[1], data)
                .filter(is_truthy)
                .map(|value| display_value(&value))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Resolve the first `[...]` group of a placeholder body.
///
/// The dotted path is walked from the root of `data`. When that yields nothing
/// usable and the placeholder has a prefix (`list` in `list[items]`), the path
/// is retried under the prefix.
pub fn resolve_bracket_path(body: &str, data: &Value) -> Option<Value> {
    let path = BRACKET_PATH.captures(body)?.get(1)?.as_str();
    let parts: Vec<&str> = path.split('.').collect();

    let from_root = lookup(data, &parts);
    if from_root.as_ref().is_some_and(is_truthy) {
        return from_root;
    }

    let prefix = body[..body.find('[').unwrap_or(0)].trim();
    if prefix.is_empty() {
        return from_root;
    }
    let scoped: Vec<&str> = prefix.split('.').chain(parts.iter().copied()).collect();
    match lookup(data, &scoped) {
        Some(value) if is_truthy(&value) => Some(value),
        _ => from_root,
    }
}

/// Merge `data` into a text template.
pub fn generate_document(template: &str, data: &Value) -> String {
    let document = substitute_scalars(template, data);
    substitute_nested_paths(&document, data)
}

/// Text engine for plain-text templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderEngine;

impl PlaceholderEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEngine for PlaceholderEngine {
    fn generate(&self, template: &[u8], data: &Value) -> Result<Vec<u8>, GeneratorError> {
        let template = std::str::from_utf8(template)?;
        Ok(generate_document(template, data).into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }
}
