//! Conservative checks that keep the markup pass away from code.
//!
//! Everything here errs on the side of skipping: a literal left untranslated is
//! cheap to fix by hand, a rewritten expression is a broken template.

use std::sync::LazyLock;

use regex::Regex;

static LOGICAL_OPERATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&&|\|\||===|!==|==|!=|\?\?").unwrap());

static TERNARY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s\?\s.+\s:\s").unwrap());

static MEMBER_ACCESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_$][\w$]*(?:\.|\?\.)[A-Za-z_$][\w$]*").unwrap());

static INDEX_ACCESS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w$\]]\[").unwrap());

static CALL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z_$][\w$]*\(").unwrap());

/// Quoted sub-literals inside an object or array expression.
pub static QUOTED_LITERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'([^'\\\n]*)'|"([^"\\\n]*)""#).unwrap());

/// Matches `callee(` for any of the given callee names, not preceded by an
/// identifier character.
pub fn translation_call_regex(callees: &[String]) -> Result<Regex, regex::Error> {
    let mut names: Vec<String> = callees.iter().map(|c| regex::escape(c)).collect();
    // Longest first so `this.$t` wins over `$t`.
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));
    let pattern = format!(r"(?:^|[^\w$])(?:this\.)?(?:{})\s*\(", names.join("|"));
    Regex::new(&pattern)
}

/// Text already contains a translation call.
pub fn contains_translation_call(text: &str, call_regex: &Regex) -> bool {
    call_regex.is_match(text)
}

/// Text looks like a script expression rather than prose.
pub fn looks_like_expression(text: &str) -> bool {
    LOGICAL_OPERATOR_REGEX.is_match(text)
        || TERNARY_REGEX.is_match(text)
        || MEMBER_ACCESS_REGEX.is_match(text)
        || INDEX_ACCESS_REGEX.is_match(text)
        || CALL_REGEX.is_match(text)
}

/// Attribute values that are paths, links or fragment ids.
pub fn is_url_like(value: &str) -> bool {
    let value = value.trim();
    value.starts_with('/')
        || value.starts_with("http")
        || value.starts_with('#')
        || value.starts_with("./")
        || value.starts_with("../")
        || value.starts_with("mailto:")
        || value.starts_with("tel:")
}

/// A single quoted literal spanning the whole expression: `'text'`, `"text"`,
/// or a backtick literal without substitutions. Returns the inner text.
pub fn single_string_literal(expr: &str) -> Option<&str> {
    let expr = expr.trim();
    let quote = expr.chars().next()?;
    if !matches!(quote, '\'' | '"' | '`') || expr.len() < 2 || !expr.ends_with(quote) {
        return None;
    }
    let inner = &expr[1..expr.len() - 1];
    if inner.contains(quote) || inner.contains('\\') {
        return None;
    }
    if quote == '`' && inner.contains("${") {
        return None;
    }
    Some(inner)
}

/// True when the first non-space character after `end` is `:`, i.e. the
/// literal is an object key (or the first branch of a ternary).
pub fn is_followed_by_colon(expr: &str, end: usize) -> bool {
    expr[end..].trim_start().starts_with(':')
}
