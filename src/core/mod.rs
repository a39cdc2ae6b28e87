//! The rewrite engine.
//!
//! Everything under `core` is I/O free: callers hand in source text and a
//! [`TransformOptions`], and get back a [`TransformResult`].
//!
//! ## Module Structure
//!
//! - `locale` / `matcher`: literal text to translation key resolution
//! - `provider`: per-library call, import and hook templates
//! - `markup` / `script`: the two fragment transformers
//! - `sfc`: splits single-file components into fragments
//! - `transform`: whole-file orchestration

pub mod context;
pub mod edits;
pub mod error;
pub mod locale;
pub mod markup;
pub mod matcher;
pub mod provider;
pub mod script;
pub mod sfc;
pub mod transform;
pub mod types;

pub use context::{FileKind, TransformContext, TransformOptions, provider_for};
pub use error::{FragmentKind, TransformError};
pub use locale::LocaleMap;
pub use matcher::{KeyGeneratorFn, MatchOrigin, OverrideFn, TextMatcher, slug_key};
pub use provider::{
    CallScope, ImportDeclaration, Provider, ProviderKind, ReactProvider, TranslationProvider,
    VanillaProvider, VueProvider,
};
pub use transform::{transform, transform_with_context};
pub use types::{MatchKind, TextMatch, TransformResult};
