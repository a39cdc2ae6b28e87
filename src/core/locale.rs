//! Nested per-language translation dictionaries.
//!
//! A locale map is `{ "<lang>": { "<key>": "<text>" | { ... } } }`. Enumeration
//! order is the insertion order of the underlying JSON (serde_json is built with
//! `preserve_order`), so "first language wins" is well defined.

use serde_json::{Map, Value};

use crate::core::error::TransformError;

#[derive(Debug, Clone, PartialEq)]
pub struct LocaleMap {
    languages: Map<String, Value>,
}

impl LocaleMap {
    /// Validate and wrap a JSON value.
    ///
    /// The value must be an object (not an array) with at least one language,
    /// and each language must map to an object.
    pub fn new(value: Value) -> Result<Self, TransformError> {
        let Value::Object(languages) = value else {
            return Err(TransformError::configuration(
                "locale map must be an object keyed by language",
            ));
        };
        if languages.is_empty() {
            return Err(TransformError::configuration(
                "locale map must contain at least one language",
            ));
        }
        for (lang, node) in &languages {
            if !node.is_object() {
                return Err(TransformError::configuration(format!(
                    "locale '{}' must map to an object",
                    lang
                )));
            }
        }
        Ok(Self { languages })
    }

    pub fn from_json_str(json: &str) -> Result<Self, TransformError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| TransformError::configuration(format!("invalid locale JSON: {}", e)))?;
        Self::new(value)
    }

    /// Build from `(language, tree)` pairs, keeping their order.
    pub fn from_languages<I>(languages: I) -> Result<Self, TransformError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self::new(Value::Object(languages.into_iter().collect()))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    pub fn get(&self, lang: &str) -> Option<&Value> {
        self.languages.get(lang)
    }

    /// Find the dot-path of the first leaf equal to `text`.
    ///
    /// Languages are searched in enumeration order and each tree depth-first.
    /// The language tag is not part of the returned path.
    pub fn find_key(&self, text: &str) -> Option<String> {
        let mut path = Vec::new();
        self.languages
            .values()
            .find_map(|root| find_in_node(root, text, &mut path))
    }

    /// Resolve a dot-path in one language.
    pub fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        let mut current = self.languages.get(lang)?;
        for part in key.split('.') {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        current.as_str()
    }
}

fn find_in_node(node: &Value, text: &str, path: &mut Vec<String>) -> Option<String> {
    match node {
        Value::String(s) if s == text && !path.is_empty() => Some(path.join(".")),
        Value::Object(map) => map.iter().find_map(|(key, child)| {
            path.push(key.clone());
            let found = find_in_node(child, text, path);
            path.pop();
            found
        }),
        Value::Array(items) => items.iter().enumerate().find_map(|(index, child)| {
            path.push(index.to_string());
            let found = find_in_node(child, text, path);
            path.pop();
            found
        }),
        _ => None,
    }
}
