//! Per-run transform configuration.
//!
//! [`TransformOptions`] is what callers fill in; [`TransformContext`] is the
//! validated, immutable form threaded through every transformer. There is no
//! global state: a context owns its matcher (and cache) and provider.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::TransformError;
use crate::core::locale::LocaleMap;
use crate::core::matcher::{KeyGeneratorFn, OverrideFn, TextMatcher};
use crate::core::provider::{Provider, ProviderKind, ReactProvider, VanillaProvider, VueProvider};

pub const DEFAULT_REACTIVE_PRIMITIVES: &[&str] =
    &["ref", "reactive", "shallowRef", "shallowReactive"];

pub const DEFAULT_INTERPOLATION_COMPONENTS: &[&str] = &["i18n", "i18n-t", "Trans", "Translation"];

/// What kind of source a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Single-file component with `<template>` and `<script>` blocks.
    Vue,
    /// Plain script; `jsx` enables inline markup.
    Script { jsx: bool },
    /// Plain markup (template only).
    Markup,
}

impl FileKind {
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension().and_then(|e| e.to_str())? {
            "vue" => Some(FileKind::Vue),
            "jsx" | "tsx" => Some(FileKind::Script { jsx: true }),
            "js" | "ts" | "mjs" | "cjs" | "mts" | "cts" => Some(FileKind::Script { jsx: false }),
            "html" | "htm" => Some(FileKind::Markup),
            _ => None,
        }
    }

    pub fn default_provider_kind(&self) -> ProviderKind {
        match self {
            FileKind::Vue => ProviderKind::Vue,
            FileKind::Script { jsx: true } => ProviderKind::React,
            FileKind::Script { jsx: false } | FileKind::Markup => ProviderKind::Vanilla,
        }
    }
}

#[derive(Clone)]
pub struct TransformOptions {
    pub locales: Option<Arc<LocaleMap>>,
    pub kind: FileKind,
    pub custom: Option<OverrideFn>,
    pub generator: Option<KeyGeneratorFn>,
    pub transform_script: bool,
    pub transform_template: bool,
    /// Wrap top-level declarations in the provider's reactive wrapper.
    pub wrap_reactive: bool,
    /// Wrapper calls stripped from top-level initializers, e.g. `ref`.
    pub reactive_primitives: Vec<String>,
    /// Components whose children are handed verbatim to the i18n runtime.
    pub interpolation_components: Vec<String>,
    /// `None` picks the default provider for `kind`.
    pub provider: Option<Provider>,
    pub debug: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            locales: None,
            kind: FileKind::Vue,
            custom: None,
            generator: None,
            transform_script: true,
            transform_template: true,
            wrap_reactive: true,
            reactive_primitives: DEFAULT_REACTIVE_PRIMITIVES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            interpolation_components: DEFAULT_INTERPOLATION_COMPONENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            provider: None,
            debug: false,
        }
    }
}

impl fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformOptions")
            .field("locales", &self.locales.as_ref().map(|l| l.language_count()))
            .field("kind", &self.kind)
            .field("custom", &self.custom.is_some())
            .field("generator", &self.generator.is_some())
            .field("transform_script", &self.transform_script)
            .field("transform_template", &self.transform_template)
            .field("wrap_reactive", &self.wrap_reactive)
            .field("provider", &self.provider)
            .field("debug", &self.debug)
            .finish()
    }
}

impl TransformOptions {
    pub fn new(locales: Arc<LocaleMap>, kind: FileKind) -> Self {
        Self {
            locales: Some(locales),
            kind,
            ..Default::default()
        }
    }
}

pub fn provider_for(kind: ProviderKind, vanilla: &VanillaProvider) -> Provider {
    match kind {
        ProviderKind::Vue => Provider::from(VueProvider),
        ProviderKind::React => Provider::from(ReactProvider),
        ProviderKind::Vanilla => Provider::from(vanilla.clone()),
    }
}

/// Validated state shared by the markup and script passes of one run.
#[derive(Debug)]
pub struct TransformContext {
    pub matcher: TextMatcher,
    pub provider: Provider,
    pub kind: FileKind,
    pub transform_script: bool,
    pub transform_template: bool,
    pub wrap_reactive: bool,
    pub reactive_primitives: Vec<String>,
    pub interpolation_components: Vec<String>,
    pub debug: bool,
}

impl TransformContext {
    /// Fails with a configuration error when no locale map is present.
    pub fn new(options: &TransformOptions) -> Result<Self, TransformError> {
        let locales = options
            .locales
            .clone()
            .ok_or_else(|| TransformError::configuration("a locale map is required"))?;
        if locales.language_count() == 0 {
            return Err(TransformError::configuration(
                "locale map must contain at least one language",
            ));
        }

        let matcher = TextMatcher::new(locales)
            .with_custom(options.custom.clone())
            .with_generator(options.generator.clone())
            .with_debug(options.debug);
        let provider = options.provider.clone().unwrap_or_else(|| {
            provider_for(options.kind.default_provider_kind(), &VanillaProvider::default())
        });

        Ok(Self {
            matcher,
            provider,
            kind: options.kind,
            transform_script: options.transform_script,
            transform_template: options.transform_template,
            wrap_reactive: options.wrap_reactive,
            reactive_primitives: options.reactive_primitives.clone(),
            interpolation_components: options.interpolation_components.clone(),
            debug: options.debug,
        })
    }

    pub fn is_interpolation_component(&self, tag: &str) -> bool {
        self.interpolation_components.iter().any(|c| c == tag)
    }

    pub fn is_reactive_primitive(&self, callee: &str) -> bool {
        self.reactive_primitives.iter().any(|p| p == callee)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::provider::TranslationProvider;

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path("src/App.vue"), Some(FileKind::Vue));
        assert_eq!(
            FileKind::from_path("a/b.tsx"),
            Some(FileKind::Script { jsx: true })
        );
        assert_eq!(
            FileKind::from_path("a/b.ts"),
            Some(FileKind::Script { jsx: false })
        );
        assert_eq!(FileKind::from_path("index.html"), Some(FileKind::Markup));
        assert_eq!(FileKind::from_path("README.md"), None);
        assert_eq!(FileKind::from_path("Makefile"), None);
    }

    #[test]
    fn test_missing_locales_is_configuration_error() {
        let err = TransformContext::new(&TransformOptions::default()).unwrap_err();
        assert!(matches!(err, TransformError::Configuration(_)));
    }

    #[test]
    fn test_default_provider_follows_kind() {
        let locales = Arc::new(LocaleMap::new(json!({"en": {}})).unwrap());
        let vue =
            TransformContext::new(&TransformOptions::new(locales.clone(), FileKind::Vue)).unwrap();
        assert_eq!(vue.provider.name(), "vue");

        let jsx = TransformContext::new(&TransformOptions::new(
            locales.clone(),
            FileKind::Script { jsx: true },
        ))
        .unwrap();
        assert_eq!(jsx.provider.name(), "react");

        let html =
            TransformContext::new(&TransformOptions::new(locales, FileKind::Markup)).unwrap();
        assert_eq!(html.provider.name(), "vanilla");
    }
}
