use std::fmt;

use serde::Serialize;

use crate::core::error::TransformError;
use crate::core::matcher::MatchOrigin;

/// Syntactic position a literal was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    // Markup
    TemplateText,
    StaticAttribute,
    DirectiveExpression,
    DirectiveSubLiteral,
    TemplateInterpolation,
    // Script
    StringLiteral,
    TemplateLiteral,
    ArrayElement,
    ObjectProperty,
    JsxText,
    JsxAttribute,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::TemplateText => "template-text",
            MatchKind::StaticAttribute => "static-attribute",
            MatchKind::DirectiveExpression => "directive-expression",
            MatchKind::DirectiveSubLiteral => "directive-sub-literal",
            MatchKind::TemplateInterpolation => "template-interpolation",
            MatchKind::StringLiteral => "string-literal",
            MatchKind::TemplateLiteral => "template-literal",
            MatchKind::ArrayElement => "array-element",
            MatchKind::ObjectProperty => "object-property",
            MatchKind::JsxText => "jsx-text",
            MatchKind::JsxAttribute => "jsx-attribute",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One successful rewrite of a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMatch {
    /// The literal text as written (trimmed, quotes removed).
    pub text: String,
    pub key: String,
    pub kind: MatchKind,
    pub origin: MatchOrigin,
    /// Byte offset of the literal, relative to the text it was found in.
    #[serde(skip)]
    pub offset: usize,
    /// 1-based line, filled in once the offset is known relative to the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column (in characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
}

impl TextMatch {
    pub fn new(
        text: impl Into<String>,
        key: impl Into<String>,
        kind: MatchKind,
        origin: MatchOrigin,
        offset: usize,
    ) -> Self {
        Self {
            text: text.into(),
            key: key.into(),
            kind,
            origin,
            offset,
            line: None,
            col: None,
        }
    }
}

/// Output of one fragment transformer.
///
/// `code` is either fully transformed or, when `error` is set, the original
/// fragment text untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentOutput {
    pub code: String,
    pub matches: Vec<TextMatch>,
    pub error: Option<TransformError>,
}

impl FragmentOutput {
    pub fn ok(code: String, matches: Vec<TextMatch>) -> Self {
        Self {
            code,
            matches,
            error: None,
        }
    }

    pub fn failed(original: &str, error: TransformError) -> Self {
        Self {
            code: original.to_string(),
            matches: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_changed(&self, original: &str) -> bool {
        self.code != original
    }
}

/// Result of transforming one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformResult {
    pub code: String,
    pub matches: Vec<TextMatch>,
    pub errors: Vec<TransformError>,
}

impl TransformResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
