//! Offset-preserving parser for template markup, built on tree-sitter-html.
//!
//! Produces a tree of elements, text, `{{ }}` interpolations and comments. All
//! positions are byte offsets into the parsed fragment; no text is copied
//! except tag and attribute names.

use thiserror::Error;
use tree_sitter::{Node as TsNode, Parser as TSParser};

/// Half-open byte range `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Narrow to the non-whitespace part of the spanned text.
    pub fn trimmed(&self, source: &str) -> Span {
        let text = self.slice(source);
        let leading = text.len() - text.trim_start().len();
        let trailing = text.len() - text.trim_end().len();
        if leading == text.len() {
            return Span::new(self.start, self.start);
        }
        Span::new(self.start + leading, self.end - trailing)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Span),
    /// `{{ expr }}`: `span` covers the delimiters, `expr` the inside.
    Interpolation { span: Span, expr: Span },
    Comment(Span),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Content of raw-text elements (`<script>`, `<style>`), not parsed.
    pub raw_content: Option<Span>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<AttrValue>,
    /// From the first character of the name to the closing quote.
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrValue {
    /// Value content, without quotes.
    pub span: Span,
    pub quote: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct MarkupParseError {
    pub message: String,
    pub offset: usize,
}

impl MarkupParseError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose end tag HTML lets the author omit.
const OPTIONAL_END_ELEMENTS: &[&str] = &[
    "li", "p", "dt", "dd", "option", "optgroup", "tr", "td", "th", "thead", "tbody", "tfoot",
    "colgroup", "caption", "rb", "rt", "rtc", "rp", "html", "head", "body",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse a markup fragment.
///
/// The grammar recovers from unclosed elements by closing them implicitly.
/// Only elements HTML allows to end implicitly are accepted that way; any
/// other unclosed element is an error, as is anything the grammar could not
/// make sense of.
pub fn parse_markup(source: &str) -> Result<Vec<Node>, MarkupParseError> {
    let masked = mask_markup(source)?;

    let mut ts_parser = TSParser::new();
    ts_parser
        .set_language(&tree_sitter_html::LANGUAGE.into())
        .map_err(|e| MarkupParseError::new(format!("cannot load markup grammar: {e}"), 0))?;
    let tree = ts_parser
        .parse(&masked, None)
        .ok_or_else(|| MarkupParseError::new("markup parser returned no tree", 0))?;

    let root = tree.root_node();
    if let Some(bad) = first_error(root) {
        let message = if bad.is_missing() {
            format!("expected `{}`", bad.kind())
        } else {
            "unexpected markup".to_string()
        };
        return Err(MarkupParseError::new(message, bad.start_byte()));
    }
    TreeBuilder { source }.children(root)
}

/// Copy of `source` with identical byte offsets, where interpolation bodies and
/// stray `<`, `>` and `&` in text are blanked out. The grammar then only sees markup
/// structure; all spans are read back from the original.
fn mask_markup(source: &str) -> Result<String, MarkupParseError> {
    let mut masked = String::with_capacity(source.len());
    let mut pos = 0;

    while let Some(c) = source[pos..].chars().next() {
        let rest = &source[pos..];
        if rest.starts_with("<!--") {
            let end = rest.find("-->").map_or(rest.len(), |i| i + 3);
            masked.push_str(&rest[..end]);
            pos += end;
        } else if rest.starts_with("{{") {
            let close = rest[2..]
                .find("}}")
                .ok_or_else(|| MarkupParseError::new("unclosed interpolation", pos))?;
            masked.push_str("{{");
            masked.push_str(&" ".repeat(close));
            masked.push_str("}}");
            pos += close + 4;
        } else if let Some(name) = tag_name_at(rest) {
            let end = tag_end(rest);
            masked.push_str(&rest[..end]);
            pos += end;
            // Raw text runs verbatim up to its closing tag.
            if !rest.starts_with("</") && is_raw_text(name) {
                let closing = format!("</{}", name.to_ascii_lowercase());
                let raw = source[pos..]
                    .to_ascii_lowercase()
                    .find(&closing)
                    .unwrap_or(source.len() - pos);
                masked.push_str(&source[pos..pos + raw]);
                pos += raw;
            }
        } else {
            let stray = match c {
                '<' | '>' => true,
                '&' => !rest[1..].starts_with(|n: char| n == '#' || n.is_ascii_alphabetic()),
                _ => false,
            };
            masked.push(if stray { ' ' } else { c });
            pos += c.len_utf8();
        }
    }
    Ok(masked)
}

/// Name of the tag opening at the start of `rest`, if `<` starts a tag.
/// Doctypes and other `<!` declarations yield an empty name.
fn tag_name_at(rest: &str) -> Option<&str> {
    let after = rest.strip_prefix('<')?;
    if after.starts_with('!') {
        return Some("");
    }
    let after = after.strip_prefix('/').unwrap_or(after);
    if !after.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
        .unwrap_or(after.len());
    Some(&after[..len])
}

/// Byte length of the tag at the start of `rest`, up to and including the
/// `>` that is not inside a quoted value.
fn tag_end(rest: &str) -> usize {
    let mut quote = None;
    for (i, c) in rest.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return i + 1,
            _ => {}
        }
    }
    rest.len()
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| raw.eq_ignore_ascii_case(name))
}

fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).find_map(first_error)
}

fn span_of(node: TsNode) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

struct TreeBuilder<'a> {
    source: &'a str,
}

impl<'a> TreeBuilder<'a> {
    fn text(&self, node: TsNode) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn children(&self, parent: TsNode) -> Result<Vec<Node>, MarkupParseError> {
        let mut nodes = Vec::new();
        // Adjacent text and entity nodes form one run of text.
        let mut run: Option<Span> = None;

        let mut cursor = parent.walk();
        for child in parent.children(&mut cursor) {
            if matches!(child.kind(), "text" | "entity") {
                let span = span_of(child);
                run = Some(run.map_or(span, |r| Span::new(r.start, span.end)));
                continue;
            }
            if let Some(text) = run.take() {
                self.split_text(text, &mut nodes);
            }
            match child.kind() {
                "element" | "script_element" | "style_element" => {
                    nodes.push(Node::Element(self.element(child)?));
                }
                "comment" => nodes.push(Node::Comment(span_of(child))),
                "erroneous_end_tag" => {
                    return Err(MarkupParseError::new(
                        format!("unexpected closing tag {}", self.text(child)),
                        child.start_byte(),
                    ));
                }
                _ => {}
            }
        }
        if let Some(text) = run {
            self.split_text(text, &mut nodes);
        }
        Ok(nodes)
    }

    /// Split a run of text around its `{{ }}` interpolations.
    fn split_text(&self, span: Span, nodes: &mut Vec<Node>) {
        let mut start = span.start;
        while let Some(open) = self.source[start..span.end].find("{{") {
            let open = start + open;
            let Some(close) = self.source[open + 2..span.end].find("}}") else {
                break;
            };
            let close = open + 2 + close;
            if open > start {
                nodes.push(Node::Text(Span::new(start, open)));
            }
            nodes.push(Node::Interpolation {
                span: Span::new(open, close + 2),
                expr: Span::new(open + 2, close),
            });
            start = close + 2;
        }
        if start < span.end {
            nodes.push(Node::Text(Span::new(start, span.end)));
        }
    }

    fn element(&self, node: TsNode) -> Result<Element, MarkupParseError> {
        let mut cursor = node.walk();
        let parts: Vec<TsNode> = node.children(&mut cursor).collect();

        let tag = parts
            .iter()
            .find(|p| matches!(p.kind(), "start_tag" | "self_closing_tag"))
            .copied()
            .ok_or_else(|| MarkupParseError::new("element without a tag", node.start_byte()))?;
        let mut tag_cursor = tag.walk();
        let tag_parts: Vec<TsNode> = tag.children(&mut tag_cursor).collect();

        let name = tag_parts
            .iter()
            .find(|p| p.kind() == "tag_name")
            .map(|p| self.text(*p).to_string())
            .unwrap_or_default();
        let attrs = tag_parts
            .iter()
            .filter(|p| p.kind() == "attribute")
            .map(|p| self.attribute(*p))
            .collect();

        let lower = name.to_ascii_lowercase();
        let closed = tag.kind() == "self_closing_tag"
            || parts.iter().any(|p| p.kind() == "end_tag")
            || VOID_ELEMENTS.contains(&lower.as_str())
            || OPTIONAL_END_ELEMENTS.contains(&lower.as_str());
        if !closed {
            return Err(MarkupParseError::new(
                format!("unclosed tag <{name}>"),
                node.start_byte(),
            ));
        }

        let (children, raw_content) = if matches!(node.kind(), "script_element" | "style_element") {
            let raw = parts
                .iter()
                .find(|p| p.kind() == "raw_text")
                .map(|p| span_of(*p))
                .unwrap_or(Span::new(tag.end_byte(), tag.end_byte()));
            (Vec::new(), Some(raw))
        } else {
            (self.children(node)?, None)
        };

        Ok(Element {
            name,
            attrs,
            children,
            raw_content,
            span: span_of(node),
        })
    }

    fn attribute(&self, node: TsNode) -> Attribute {
        let mut name = String::new();
        let mut value = None;

        let mut cursor = node.walk();
        for part in node.children(&mut cursor) {
            match part.kind() {
                "attribute_name" => name = self.text(part).to_string(),
                "attribute_value" => {
                    value = Some(AttrValue {
                        span: span_of(part),
                        quote: None,
                    });
                }
                "quoted_attribute_value" => value = Some(self.quoted_value(part)),
                _ => {}
            }
        }
        Attribute {
            name,
            value,
            span: span_of(node),
        }
    }

    fn quoted_value(&self, node: TsNode) -> AttrValue {
        let quote = self.text(node).chars().next();
        let mut cursor = node.walk();
        let inner = node
            .children(&mut cursor)
            .find(|p| p.kind() == "attribute_value")
            .map(span_of);
        // `""` has no inner value node.
        let empty = Span::new(node.start_byte() + 1, node.start_byte() + 1);
        AttrValue {
            span: inner.unwrap_or(empty),
            quote,
        }
    }
}
