//! Error taxonomy of the transform engine.
//!
//! Only [`TransformError::Configuration`] ever escapes `transform()` as an `Err`.
//! Fragment-level failures are collected into `TransformResult::errors` and the
//! offending fragment keeps its original text.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which kind of fragment an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentKind {
    Markup,
    Script,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Markup => write!(f, "markup"),
            FragmentKind::Script => write!(f, "script"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Missing or invalid locale map. Raised before any parsing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A markup or script fragment could not be parsed.
    #[error("failed to parse {fragment} fragment: {message}")]
    FragmentParse {
        fragment: FragmentKind,
        message: String,
        /// Raw text of the fragment that failed.
        raw: String,
    },

    /// Rewriting failed after a successful parse.
    #[error("failed to transform {fragment} fragment: {message}")]
    Internal {
        fragment: FragmentKind,
        message: String,
    },
}

impl TransformError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn fragment_parse(
        fragment: FragmentKind,
        message: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self::FragmentParse {
            fragment,
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn internal(fragment: FragmentKind, message: impl Into<String>) -> Self {
        Self::Internal {
            fragment,
            message: message.into(),
        }
    }

    /// The fragment this error is attached to, if any.
    pub fn fragment(&self) -> Option<FragmentKind> {
        match self {
            TransformError::Configuration(_) => None,
            TransformError::FragmentParse { fragment, .. }
            | TransformError::Internal { fragment, .. } => Some(*fragment),
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, TransformError::FragmentParse { .. })
    }
}

impl Serialize for TransformError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let kind = match self {
            TransformError::Configuration(_) => "configuration",
            TransformError::FragmentParse { .. } => "parse",
            TransformError::Internal { .. } => "internal",
        };
        let mut state = serializer.serialize_struct("TransformError", 3)?;
        state.serialize_field("kind", kind)?;
        state.serialize_field("fragment", &self.fragment())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TransformError::fragment_parse(FragmentKind::Markup, "unclosed <div>", "<div>");
        assert_eq!(
            err.to_string(),
            "failed to parse markup fragment: unclosed <div>"
        );
        assert_eq!(err.fragment(), Some(FragmentKind::Markup));
        assert!(err.is_parse_error());

        let err = TransformError::configuration("locale map is empty");
        assert_eq!(err.to_string(), "configuration error: locale map is empty");
        assert_eq!(err.fragment(), None);
    }

    #[test]
    fn test_serialize_shape() {
        let err = TransformError::internal(FragmentKind::Script, "overlapping edit");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "internal");
        assert_eq!(json["fragment"], "script");
    }
}
