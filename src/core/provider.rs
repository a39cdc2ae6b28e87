//! Translation call providers.
//!
//! A provider describes how a translation call is rendered for a given scope
//! and which imports/hooks must accompany it. Optional capabilities return
//! `None` when unsupported and are always checked before use.
//!
//! | Provider | Template  | Module   | Instance       | Imports / hooks                       |
//! |----------|-----------|----------|----------------|---------------------------------------|
//! | Vue      | `$t('k')` | `t('k')` | `this.$t('k')` | `useI18n` from `vue-i18n`, `computed` |
//! | React    | `t('k')`  | `t('k')` | -              | `useTranslation` from `react-i18next` |
//! | Vanilla  | `fn('k')` | `fn('k')`| -              | optional configured import            |

use std::fmt;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// Where a translation call is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallScope {
    /// Markup expressions (interpolations, bound attributes).
    Template,
    /// Script code with a module-level translation binding.
    Module,
    /// Methods of an options-style component object (`this` is the instance).
    Instance,
}

/// Quote style for the key literal inside a rendered call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    Single,
    Double,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }

    /// The quote to use inside an attribute delimited by `delimiter`.
    pub fn inside(delimiter: Option<char>) -> Self {
        match delimiter {
            Some('\'') => Quote::Double,
            _ => Quote::Single,
        }
    }
}

/// A rendered-on-demand translation call: `callee('key')`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationCall {
    pub callee: String,
    pub key: String,
}

impl TranslationCall {
    pub fn new(callee: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            key: key.into(),
        }
    }

    pub fn render(&self, quote: Quote) -> String {
        let q = quote.as_char();
        let mut escaped = String::with_capacity(self.key.len());
        for c in self.key.chars() {
            if c == q || c == '\\' {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        format!("{}({}{}{})", self.callee, q, escaped, q)
    }
}

impl fmt::Display for TranslationCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Quote::Single))
    }
}

/// `import { a, b } from 'source'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub source: String,
    pub names: Vec<String>,
}

impl ImportDeclaration {
    pub fn new(source: impl Into<String>, names: &[&str]) -> Self {
        Self {
            source: source.into(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl fmt::Display for ImportDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "import {{ {} }} from '{}'",
            self.names.join(", "),
            self.source
        )
    }
}

/// A statement that introduces translation bindings, e.g. `const { t } = useI18n()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDeclaration {
    pub code: String,
    /// Names bound by `code`; the hook is skipped when any is already declared.
    pub bindings: Vec<String>,
}

/// A reactivity wrapper such as `computed(() => expr)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactiveWrapper {
    pub callee: String,
    /// Dependency list rendered after the factory, e.g. `[t]` for `useMemo`.
    pub deps: Option<String>,
    pub import: Option<ImportDeclaration>,
}

impl ReactiveWrapper {
    pub fn wrap(&self, expr: &str) -> String {
        // Object literals need parentheses to be an arrow body.
        let body = if expr.trim_start().starts_with('{') {
            format!("({})", expr)
        } else {
            expr.to_string()
        };
        match &self.deps {
            Some(deps) => format!("{}(() => {}, {})", self.callee, body, deps),
            None => format!("{}(() => {})", self.callee, body),
        }
    }
}

/// Calls that are already localized and must not be rewritten.
pub const KNOWN_TRANSLATION_CALLEES: &[&str] = &["t", "$t", "tc", "$tc", "te", "$te"];

#[enum_dispatch]
pub trait TranslationProvider {
    fn name(&self) -> &'static str;

    /// Plain translation call for `key`.
    fn create_translation_call(&self, key: &str) -> TranslationCall;

    fn supports_scoped_calls(&self) -> bool {
        false
    }

    /// Scope-aware call. Only meaningful when `supports_scoped_calls()`.
    fn create_scoped_translation_call(
        &self,
        _key: &str,
        _scope: CallScope,
    ) -> Option<TranslationCall> {
        None
    }

    fn import_declarations(&self) -> Option<Vec<ImportDeclaration>> {
        None
    }

    fn hook_declarations(&self) -> Option<Vec<HookDeclaration>> {
        None
    }

    fn reactive_wrapper(&self) -> Option<ReactiveWrapper> {
        None
    }

    /// Callee names whose arguments are already localized.
    fn translation_callees(&self) -> Vec<String> {
        KNOWN_TRANSLATION_CALLEES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VueProvider;

impl TranslationProvider for VueProvider {
    fn name(&self) -> &'static str {
        "vue"
    }

    fn create_translation_call(&self, key: &str) -> TranslationCall {
        TranslationCall::new("t", key)
    }

    fn supports_scoped_calls(&self) -> bool {
        true
    }

    fn create_scoped_translation_call(
        &self,
        key: &str,
        scope: CallScope,
    ) -> Option<TranslationCall> {
        let callee = match scope {
            CallScope::Template => "$t",
            CallScope::Module => "t",
            CallScope::Instance => "this.$t",
        };
        Some(TranslationCall::new(callee, key))
    }

    fn import_declarations(&self) -> Option<Vec<ImportDeclaration>> {
        Some(vec![ImportDeclaration::new("vue-i18n", &["useI18n"])])
    }

    fn hook_declarations(&self) -> Option<Vec<HookDeclaration>> {
        Some(vec![HookDeclaration {
            code: "const { t } = useI18n()".to_string(),
            bindings: vec!["t".to_string()],
        }])
    }

    fn reactive_wrapper(&self) -> Option<ReactiveWrapper> {
        Some(ReactiveWrapper {
            callee: "computed".to_string(),
            deps: None,
            import: Some(ImportDeclaration::new("vue", &["computed"])),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReactProvider;

impl TranslationProvider for ReactProvider {
    fn name(&self) -> &'static str {
        "react"
    }

    fn create_translation_call(&self, key: &str) -> TranslationCall {
        TranslationCall::new("t", key)
    }

    fn import_declarations(&self) -> Option<Vec<ImportDeclaration>> {
        Some(vec![ImportDeclaration::new(
            "react-i18next",
            &["useTranslation"],
        )])
    }

    fn hook_declarations(&self) -> Option<Vec<HookDeclaration>> {
        Some(vec![HookDeclaration {
            code: "const { t } = useTranslation()".to_string(),
            bindings: vec!["t".to_string()],
        }])
    }

    fn reactive_wrapper(&self) -> Option<ReactiveWrapper> {
        Some(ReactiveWrapper {
            callee: "useMemo".to_string(),
            deps: Some("[t]".to_string()),
            import: Some(ImportDeclaration::new("react", &["useMemo"])),
        })
    }
}

/// Library-agnostic provider with a configurable function name.
#[derive(Debug, Clone)]
pub struct VanillaProvider {
    pub function_name: String,
    pub import: Option<ImportDeclaration>,
}

impl Default for VanillaProvider {
    fn default() -> Self {
        Self {
            function_name: "i18n.t".to_string(),
            import: None,
        }
    }
}

impl TranslationProvider for VanillaProvider {
    fn name(&self) -> &'static str {
        "vanilla"
    }

    fn create_translation_call(&self, key: &str) -> TranslationCall {
        TranslationCall::new(self.function_name.as_str(), key)
    }

    fn import_declarations(&self) -> Option<Vec<ImportDeclaration>> {
        self.import.clone().map(|import| vec![import])
    }

    fn translation_callees(&self) -> Vec<String> {
        let mut callees: Vec<String> = KNOWN_TRANSLATION_CALLEES
            .iter()
            .map(|s| s.to_string())
            .collect();
        callees.push(self.function_name.clone());
        callees
    }
}

#[enum_dispatch(TranslationProvider)]
#[derive(Debug, Clone)]
pub enum Provider {
    Vue(VueProvider),
    React(ReactProvider),
    Vanilla(VanillaProvider),
}

impl Provider {
    /// The call to emit for `key` in `scope`, falling back to the plain call
    /// when the provider has no scope-aware rendering.
    pub fn call_for(&self, key: &str, scope: CallScope) -> TranslationCall {
        if self.supports_scoped_calls()
            && let Some(call) = self.create_scoped_translation_call(key, scope)
        {
            return call;
        }
        self.create_translation_call(key)
    }

    /// Whether `callee` (e.g. `t`, `this.$t`, `i18n.t`) is a translation call.
    pub fn is_translation_callee(&self, callee: &str) -> bool {
        let callee = callee.strip_prefix("this.").unwrap_or(callee);
        let last = callee.rsplit('.').next().unwrap_or(callee);
        self.translation_callees()
            .iter()
            .any(|name| name == callee || name == last)
    }
}

/// Provider selection, as written in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Vue,
    React,
    Vanilla,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Vue => write!(f, "vue"),
            ProviderKind::React => write!(f, "react"),
            ProviderKind::Vanilla => write!(f, "vanilla"),
        }
    }
}
