//! Literal text → translation key resolution.
//!
//! Resolution order (first hit wins):
//! 1. custom override function
//! 2. dictionary search in the [`LocaleMap`]
//! 3. key generator function
//!
//! Results are memoized per literal for the lifetime of one matcher. The cache
//! sits behind an `RwLock` so markup and script passes can share one matcher;
//! a poisoned lock only costs a recomputation.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::debug;

use crate::core::locale::LocaleMap;

/// Custom override: returns `Some(key)` to force a key, `None` to defer.
pub type OverrideFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Key generator: invoked for every literal nothing else matched. `None`
/// leaves the literal alone.
pub type KeyGeneratorFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchOrigin {
    Custom,
    Dictionary,
    Generated,
}

impl fmt::Display for MatchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOrigin::Custom => write!(f, "custom"),
            MatchOrigin::Dictionary => write!(f, "dictionary"),
            MatchOrigin::Generated => write!(f, "generated"),
        }
    }
}

/// A resolved key together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    pub key: String,
    pub origin: MatchOrigin,
}

pub struct TextMatcher {
    locales: Arc<LocaleMap>,
    custom: Option<OverrideFn>,
    generator: Option<KeyGeneratorFn>,
    cache: RwLock<HashMap<String, Option<KeyMatch>>>,
    debug: bool,
}

impl fmt::Debug for TextMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextMatcher")
            .field("languages", &self.locales.language_count())
            .field("custom", &self.custom.is_some())
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

impl TextMatcher {
    pub fn new(locales: Arc<LocaleMap>) -> Self {
        Self {
            locales,
            custom: None,
            generator: None,
            cache: RwLock::new(HashMap::new()),
            debug: false,
        }
    }

    pub fn with_custom(mut self, custom: Option<OverrideFn>) -> Self {
        self.custom = custom;
        self.reset_cache();
        self
    }

    pub fn with_generator(mut self, generator: Option<KeyGeneratorFn>) -> Self {
        self.generator = generator;
        self.reset_cache();
        self
    }

    /// Log every cache miss at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn locales(&self) -> &LocaleMap {
        &self.locales
    }

    /// Resolve `text` to a key path. `None` means "leave the literal alone".
    pub fn match_text(&self, text: &str) -> Option<String> {
        self.resolve(text).map(|m| m.key)
    }

    /// Like [`match_text`](Self::match_text) but also reports the origin.
    pub fn resolve(&self, text: &str) -> Option<KeyMatch> {
        if text.trim().is_empty() {
            return None;
        }

        if let Ok(cache) = self.cache.read()
            && let Some(hit) = cache.get(text)
        {
            return hit.clone();
        }

        let resolved = self.resolve_uncached(text);
        if self.debug {
            match &resolved {
                Some(m) => debug!(text, key = %m.key, origin = %m.origin, "resolved literal"),
                None => debug!(text, "no key for literal"),
            }
        }

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(text.to_string(), resolved.clone());
        }
        resolved
    }

    fn resolve_uncached(&self, text: &str) -> Option<KeyMatch> {
        if let Some(custom) = &self.custom
            && let Some(key) = custom(text).filter(|k| !k.is_empty())
        {
            return Some(KeyMatch {
                key,
                origin: MatchOrigin::Custom,
            });
        }

        if let Some(key) = self.locales.find_key(text) {
            return Some(KeyMatch {
                key,
                origin: MatchOrigin::Dictionary,
            });
        }

        let generate = self.generator.as_ref()?;
        let key = generate(text).filter(|k| !k.is_empty())?;
        Some(KeyMatch {
            key,
            origin: MatchOrigin::Generated,
        })
    }

    /// Drop all memoized results.
    pub fn reset_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    #[cfg(test)]
    fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

/// Built-in key generator: `<prefix>.<slug>`.
///
/// The slug is the lowercase alphanumeric words of the text joined with `_`,
/// capped at 40 characters. Text without any alphanumeric character gets the
/// slug `text`.
pub fn slug_key(prefix: &str, text: &str) -> String {
    const MAX_SLUG_CHARS: usize = 40;

    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    let mut slug: String = words.join("_").chars().take(MAX_SLUG_CHARS).collect();
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("text");
    }

    let prefix = prefix.trim_matches('.');
    if prefix.is_empty() {
        slug
    } else {
        format!("{}.{}", prefix, slug)
    }
}
