//! Splits a single-file component into its top-level blocks.
//!
//! Only block boundaries are located here; block contents are handed to the
//! markup and script transformers untouched.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::{FragmentKind, TransformError};

static LANG_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)lang\s*=\s*["']?([\w-]+)"#).unwrap());

static SETUP_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)setup(?:\s|=|$)").unwrap());

/// A top-level block; `start..end` is the inner content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock {
    pub kind: FragmentKind,
    pub start: usize,
    pub end: usize,
    pub lang: Option<String>,
    pub setup: bool,
}

impl SfcBlock {
    pub fn content<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Script blocks written in a JSX dialect.
    pub fn is_jsx(&self) -> bool {
        matches!(self.lang.as_deref(), Some("jsx" | "tsx"))
    }
}

#[derive(Debug, Default)]
pub struct SfcDescriptor {
    pub template: Option<SfcBlock>,
    pub scripts: Vec<SfcBlock>,
    /// Blocks that could not be delimited.
    pub errors: Vec<TransformError>,
}

pub fn split_sfc(source: &str) -> SfcDescriptor {
    let mut descriptor = SfcDescriptor::default();
    let mut pos = 0;

    while let Some(found) = source[pos..].find('<') {
        let at = pos + found;
        let rest = &source[at..];

        if rest.starts_with("<!--") {
            pos = rest.find("-->").map_or(source.len(), |end| at + end + 3);
            continue;
        }
        let Some(open) = parse_open_tag(source, at) else {
            pos = at + 1;
            continue;
        };
        if open.self_closing {
            pos = open.end;
            continue;
        }

        let name = open.name.to_ascii_lowercase();
        let close = if name == "template" {
            find_template_close(source, open.end)
        } else {
            find_close(source, open.end, &name)
        };

        let Some((content_end, after_close)) = close else {
            let kind = match name.as_str() {
                "template" => Some(FragmentKind::Markup),
                "script" => Some(FragmentKind::Script),
                _ => None,
            };
            if let Some(kind) = kind {
                descriptor.errors.push(TransformError::fragment_parse(
                    kind,
                    format!("unclosed <{}> block", name),
                    &source[open.end..],
                ));
            }
            break;
        };

        let block = SfcBlock {
            kind: FragmentKind::Markup,
            start: open.end,
            end: content_end,
            lang: LANG_ATTR_REGEX
                .captures(open.attrs)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
            setup: SETUP_ATTR_REGEX.is_match(open.attrs),
        };
        match name.as_str() {
            "template" if descriptor.template.is_none() => descriptor.template = Some(block),
            "script" => descriptor.scripts.push(SfcBlock {
                kind: FragmentKind::Script,
                ..block
            }),
            _ => {}
        }
        pos = after_close;
    }

    descriptor
}

struct OpenTag<'a> {
    name: &'a str,
    attrs: &'a str,
    /// Offset just past the closing `>`.
    end: usize,
    self_closing: bool,
}

fn parse_open_tag(source: &str, at: usize) -> Option<OpenTag<'_>> {
    let rest = &source[at + 1..];
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_len = rest
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(rest.len());

    // Find the closing `>` outside of quoted attribute values.
    let mut quote: Option<char> = None;
    for (i, c) in rest[name_len..].char_indices().map(|(i, c)| (i + name_len, c)) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => {
                let inner = &rest[name_len..i];
                return Some(OpenTag {
                    name: &rest[..name_len],
                    attrs: inner.trim_end_matches('/'),
                    end: at + 1 + i + 1,
                    self_closing: inner.ends_with('/'),
                });
            }
            _ => {}
        }
    }
    None
}

/// First `</name>` at or after `from`, case-insensitive. Returns
/// `(content_end, offset_after_close)`.
fn find_close(source: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let needle = format!("</{}", name);
    let lower = source[from..].to_ascii_lowercase();
    let found = from + lower.find(&needle)?;
    let gt = source[found..].find('>')?;
    Some((found, found + gt + 1))
}

/// Like [`find_close`], balancing nested `<template>` tags.
fn find_template_close(source: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(found) = source[pos..].find('<') {
        let at = pos + found;
        let rest = &source[at..];
        if rest.starts_with("<!--") {
            pos = at + rest.find("-->")? + 3;
            continue;
        }
        if starts_with_tag(rest, "</template") {
            depth -= 1;
            let gt = rest.find('>')?;
            if depth == 0 {
                return Some((at, at + gt + 1));
            }
            pos = at + gt + 1;
            continue;
        }
        if starts_with_tag(rest, "<template")
            && let Some(open) = parse_open_tag(source, at)
        {
            if !open.self_closing {
                depth += 1;
            }
            pos = open.end;
            continue;
        }
        pos = at + 1;
    }
    None
}

/// `rest` starts with `prefix` followed by a tag-name boundary.
fn starts_with_tag(rest: &str, prefix: &str) -> bool {
    rest.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        && rest[prefix.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
}
