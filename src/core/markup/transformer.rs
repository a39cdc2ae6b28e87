//! Rewrites literal text in template markup into translation calls.
//!
//! Walks the parsed tree once, collecting one candidate edit per translatable
//! node, then applies the non-overlapping survivors.

use regex::Regex;

use crate::core::context::TransformContext;
use crate::core::edits::{Edit, EditSet};
use crate::core::error::{FragmentKind, TransformError};
use crate::core::markup::heuristics::{
    QUOTED_LITERAL_REGEX, contains_translation_call, is_followed_by_colon, is_url_like,
    looks_like_expression, single_string_literal, translation_call_regex,
};
use crate::core::markup::parser::{Attribute, Element, Node, Span, parse_markup};
use crate::core::provider::{CallScope, Quote, TranslationProvider};
use crate::core::types::{FragmentOutput, MatchKind, TextMatch};

/// Static attributes that are never user-facing text.
const STRUCTURAL_ATTRIBUTES: &[&str] = &[
    "ref", "key", "is", "class", "style", "id", "slot", "name", "type", "for", "lang",
];

/// Attribute name prefixes of bindings, events, slots and other directives.
const DIRECTIVE_PREFIXES: &[&str] = &["v-", ":", "@", "#"];

/// Directives whose value is a plain expression we may rewrite.
const BINDING_DIRECTIVES: &[&str] = &["v-text", "v-html"];

pub struct MarkupTransformer<'a> {
    ctx: &'a TransformContext,
    call_regex: Regex,
}

impl<'a> MarkupTransformer<'a> {
    pub fn new(ctx: &'a TransformContext) -> Result<Self, TransformError> {
        let call_regex = translation_call_regex(&ctx.provider.translation_callees())
            .map_err(|e| TransformError::internal(FragmentKind::Markup, e.to_string()))?;
        Ok(Self { ctx, call_regex })
    }

    /// Transform one markup fragment. Offsets in the returned matches are
    /// relative to `source`.
    pub fn transform(&self, source: &str) -> FragmentOutput {
        let nodes = match parse_markup(source) {
            Ok(nodes) => nodes,
            Err(e) => {
                return FragmentOutput::failed(
                    source,
                    TransformError::fragment_parse(FragmentKind::Markup, e.to_string(), source),
                );
            }
        };

        let mut edits = EditSet::new();
        self.visit_nodes(source, &nodes, &mut edits);
        edits.retain_longest();

        match edits.apply(source) {
            Ok(code) => FragmentOutput::ok(code, edits.into_payloads()),
            Err(e) => FragmentOutput::failed(
                source,
                TransformError::internal(FragmentKind::Markup, e.to_string()),
            ),
        }
    }

    fn visit_nodes(&self, source: &str, nodes: &[Node], edits: &mut EditSet<TextMatch>) {
        for node in nodes {
            match node {
                Node::Element(element) => self.visit_element(source, element, edits),
                Node::Text(span) => self.visit_text(source, *span, edits),
                Node::Interpolation { expr, .. } => self.visit_interpolation(source, *expr, edits),
                Node::Comment(_) => {}
            }
        }
    }

    fn visit_element(&self, source: &str, element: &Element, edits: &mut EditSet<TextMatch>) {
        // Interpolation components hand their children to the i18n runtime.
        if self.ctx.is_interpolation_component(&element.name) {
            return;
        }
        for attr in &element.attrs {
            self.visit_attribute(source, attr, edits);
        }
        if element.raw_content.is_none() {
            self.visit_nodes(source, &element.children, edits);
        }
    }

    fn template_call(&self, key: &str, quote: Quote) -> String {
        self.ctx
            .provider
            .call_for(key, CallScope::Template)
            .render(quote)
    }

    /// Shared skip rules for any candidate text.
    fn is_skippable(&self, raw: &str) -> bool {
        contains_translation_call(raw, &self.call_regex) || looks_like_expression(raw)
    }

    fn visit_text(&self, source: &str, span: Span, edits: &mut EditSet<TextMatch>) {
        let trimmed = span.trimmed(source);
        if trimmed.is_empty() {
            return;
        }
        let text = trimmed.slice(source);
        if self.is_skippable(text) {
            return;
        }
        let Some(found) = self.ctx.matcher.resolve(text) else {
            return;
        };
        let replacement = format!("{{{{ {} }}}}", self.template_call(&found.key, Quote::Single));
        edits.push(
            Edit::replace(trimmed.start, trimmed.end, replacement),
            TextMatch::new(text, found.key, MatchKind::TemplateText, found.origin, trimmed.start),
        );
    }

    fn visit_interpolation(&self, source: &str, expr: Span, edits: &mut EditSet<TextMatch>) {
        let trimmed = expr.trimmed(source);
        let raw = trimmed.slice(source);
        if contains_translation_call(raw, &self.call_regex) {
            return;
        }
        let Some(text) = single_string_literal(raw) else {
            return;
        };
        let Some(found) = self.ctx.matcher.resolve(text) else {
            return;
        };
        edits.push(
            Edit::replace(
                trimmed.start,
                trimmed.end,
                self.template_call(&found.key, Quote::Single),
            ),
            TextMatch::new(
                text,
                found.key,
                MatchKind::TemplateInterpolation,
                found.origin,
                trimmed.start,
            ),
        );
    }

    fn visit_attribute(&self, source: &str, attr: &Attribute, edits: &mut EditSet<TextMatch>) {
        let Some(value) = attr.value else {
            return;
        };
        let name = attr.name.as_str();

        if let Some(bound) = bound_attribute_name(name) {
            if bound.is_empty() || STRUCTURAL_ATTRIBUTES.contains(&bound) {
                return;
            }
            self.visit_directive(source, value.span, value.quote, edits);
            return;
        }
        if BINDING_DIRECTIVES.contains(&name) {
            self.visit_directive(source, value.span, value.quote, edits);
            return;
        }
        if DIRECTIVE_PREFIXES.iter().any(|p| name.starts_with(p))
            || STRUCTURAL_ATTRIBUTES.contains(&name.to_ascii_lowercase().as_str())
            || name.starts_with("data-")
        {
            return;
        }

        // Static attribute.
        let raw = value.span.slice(source);
        let text = raw.trim();
        if text.is_empty() || is_url_like(text) || self.is_skippable(text) {
            return;
        }
        let Some(found) = self.ctx.matcher.resolve(text) else {
            return;
        };
        let delimiter = value.quote.unwrap_or('"');
        let call = self.template_call(&found.key, Quote::inside(Some(delimiter)));
        let replacement = format!(":{}={}{}{}", name, delimiter, call, delimiter);
        let offset = value.span.start + (raw.len() - raw.trim_start().len());
        edits.push(
            Edit::replace(attr.span.start, attr.span.end, replacement),
            TextMatch::new(text, found.key, MatchKind::StaticAttribute, found.origin, offset),
        );
    }

    /// Bound attribute (`:title="..."`, `v-text="..."`): rewrite a single
    /// literal wholesale, or the quoted literals of an object/array.
    fn visit_directive(
        &self,
        source: &str,
        span: Span,
        delimiter: Option<char>,
        edits: &mut EditSet<TextMatch>,
    ) {
        let trimmed = span.trimmed(source);
        let expr = trimmed.slice(source);
        if expr.is_empty() || contains_translation_call(expr, &self.call_regex) {
            return;
        }
        let quote = Quote::inside(delimiter);

        if let Some(text) = single_string_literal(expr) {
            let Some(found) = self.ctx.matcher.resolve(text) else {
                return;
            };
            edits.push(
                Edit::replace(trimmed.start, trimmed.end, self.template_call(&found.key, quote)),
                TextMatch::new(
                    text,
                    found.key,
                    MatchKind::DirectiveExpression,
                    found.origin,
                    trimmed.start + 1,
                ),
            );
            return;
        }

        if !(expr.starts_with('{') || expr.starts_with('[')) {
            return;
        }
        let is_object = expr.starts_with('{');
        for captures in QUOTED_LITERAL_REGEX.captures_iter(expr) {
            let (Some(whole), Some(inner)) =
                (captures.get(0), captures.get(1).or_else(|| captures.get(2)))
            else {
                continue;
            };
            if is_object && is_followed_by_colon(expr, whole.end()) {
                continue;
            }
            let text = inner.as_str();
            let Some(found) = self.ctx.matcher.resolve(text) else {
                continue;
            };
            edits.push(
                Edit::replace(
                    trimmed.start + whole.start(),
                    trimmed.start + whole.end(),
                    self.template_call(&found.key, quote),
                ),
                TextMatch::new(
                    text,
                    found.key,
                    MatchKind::DirectiveSubLiteral,
                    found.origin,
                    trimmed.start + inner.start(),
                ),
            );
        }
    }
}

/// `:title` / `v-bind:title` → `title`; anything else → `None`.
fn bound_attribute_name(name: &str) -> Option<&str> {
    name.strip_prefix("v-bind:")
        .or_else(|| name.strip_prefix(':'))
        .map(|bound| bound.split('.').next().unwrap_or(bound))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::core::context::{FileKind, TransformOptions};
    use crate::core::locale::LocaleMap;

    fn context() -> TransformContext {
        let locales = LocaleMap::new(json!({
            "en": {
                "message": {"hello": "hello world", "title": "Welcome"},
                "plain": "plain",
                "nav": {"home": "Home", "about": "About"},
                "save": "Save"
            }
        }))
        .unwrap();
        TransformContext::new(&TransformOptions::new(Arc::new(locales), FileKind::Vue)).unwrap()
    }

    fn transform(source: &str) -> FragmentOutput {
        let ctx = context();
        MarkupTransformer::new(&ctx).unwrap().transform(source)
    }

    #[test]
    fn test_text_node() {
        let out = transform("<div>hello world</div>");
        assert_eq!(out.code, "<div>{{ $t('message.hello') }}</div>");
        assert_eq!(out.matches.len(), 1);
        assert_eq!(out.matches[0].kind, MatchKind::TemplateText);
        assert_eq!(out.matches[0].offset, 5);
        assert!(out.error.is_none());
    }

    #[test]
    fn test_text_node_keeps_surrounding_whitespace() {
        let out = transform("<p>\n  Save\n</p>");
        assert_eq!(out.code, "<p>\n  {{ $t('save') }}\n</p>");
    }

    #[test]
    fn test_static_attribute() {
        let out = transform("<input placeholder=\"plain\" />");
        assert_eq!(out.code, "<input :placeholder=\"$t('plain')\" />");
        assert_eq!(out.matches[0].kind, MatchKind::StaticAttribute);

        let out = transform("<input title='plain'>");
        assert_eq!(out.code, "<input :title='$t(\"plain\")'>");
    }

    #[test]
    fn test_structural_and_url_attributes_untouched() {
        let source = "<a class=\"Save\" href=\"/home\" ref=\"Save\" data-x=\"Save\">Home</a>";
        let out = transform(source);
        assert_eq!(
            out.code,
            "<a class=\"Save\" href=\"/home\" ref=\"Save\" data-x=\"Save\">{{ $t('nav.home') }}</a>"
        );
    }

    #[test]
    fn test_directive_single_literal() {
        let out = transform("<h1 :title=\"'Welcome'\"></h1>");
        assert_eq!(out.code, "<h1 :title=\"$t('message.title')\"></h1>");
        assert_eq!(out.matches[0].kind, MatchKind::DirectiveExpression);
    }

    #[test]
    fn test_directive_sub_literals() {
        let out = transform("<nav :items=\"[{ label: 'Home' }, { label: 'About' }]\"></nav>");
        assert_eq!(
            out.code,
            "<nav :items=\"[{ label: $t('nav.home') }, { label: $t('nav.about') }]\"></nav>"
        );
        assert_eq!(out.matches.len(), 2);
        assert!(out.matches.iter().all(|m| m.kind == MatchKind::DirectiveSubLiteral));
    }

    #[test]
    fn test_object_keys_are_skipped() {
        let out = transform("<c :labels=\"{ 'Save': 'Save' }\"></c>");
        assert_eq!(out.code, "<c :labels=\"{ 'Save': $t('save') }\"></c>");
    }

    #[test]
    fn test_event_and_control_directives_untouched() {
        let source = "<button @click=\"'Save'\" v-if=\"'Save'\">Save</button>";
        let out = transform(source);
        assert_eq!(
            out.code,
            "<button @click=\"'Save'\" v-if=\"'Save'\">{{ $t('save') }}</button>"
        );
    }

    #[test]
    fn test_interpolation_literal() {
        let out = transform("<p>{{ 'Save' }}</p>");
        assert_eq!(out.code, "<p>{{ $t('save') }}</p>");
        assert_eq!(out.matches[0].kind, MatchKind::TemplateInterpolation);
    }

    #[test]
    fn test_already_translated_is_skipped() {
        let source = "<p :title=\"$t('save')\">{{ $t('plain') }}</p>";
        let out = transform(source);
        assert_eq!(out.code, source);
        assert!(out.matches.is_empty());
    }

    #[test]
    fn test_expression_like_text_is_skipped() {
        let source = "<p>user.name</p>";
        assert_eq!(transform(source).code, source);
    }

    #[test]
    fn test_interpolation_component_subtree_untouched() {
        let source = "<i18n-t keypath=\"plain\"><b>Save</b></i18n-t><span>Save</span>";
        let out = transform(source);
        assert_eq!(
            out.code,
            "<i18n-t keypath=\"plain\"><b>Save</b></i18n-t><span>{{ $t('save') }}</span>"
        );
    }

    #[test]
    fn test_unknown_text_untouched() {
        let source = "<p>Nothing here</p>";
        let out = transform(source);
        assert_eq!(out.code, source);
        assert!(out.matches.is_empty());
    }

    #[test]
    fn test_omitted_end_tags_transform() {
        let out = transform("<ul><li>Save<li>Home</ul>");
        assert_eq!(out.code, "<ul><li>{{ $t('save') }}<li>{{ $t('nav.home') }}</ul>");
        assert!(out.error.is_none());
        assert_eq!(out.matches.len(), 2);
    }

    #[test]
    fn test_parse_error_returns_original() {
        let source = "<div><span>hello world</div>";
        let out = transform(source);
        assert_eq!(out.code, source);
        assert!(out.matches.is_empty());
        assert!(out.error.as_ref().is_some_and(|e| e.is_parse_error()));
    }

    #[test]
    fn test_idempotent() {
        let first = transform("<div title=\"plain\">hello world</div>").code;
        let second = transform(&first).code;
        assert_eq!(first, second);
    }
}
