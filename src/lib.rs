//! i18nify - rewrite hard-coded UI strings into i18n translation calls
//!
//! i18nify is a CLI tool and library that finds natural-language string
//! literals in Vue single-file components, JSX/TSX and plain scripts, looks
//! them up in a locale dictionary and replaces them with calls to the
//! project's translation function (`$t`, `t`, `i18n.t`, ...).
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: The rewrite engine (I/O free)
//! - `locales`: Locale directory loading and generated-key write-back
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod locales;
pub mod utils;
