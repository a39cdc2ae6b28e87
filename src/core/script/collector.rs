//! AST walk that finds translatable literals in a script fragment.
//!
//! The collector only records candidate edits; it never touches the source.
//! Each edit carries the matches it produces and whether it introduced a
//! module-scope call (which later decides import and hook injection).

use swc_common::Span;
use swc_ecma_ast::{
    ArrayLit, BinExpr, BinaryOp, CallExpr, Callee, Decl, ExportAll, ExportDefaultExpr, Expr,
    ExprStmt, ImportDecl, JSXAttr, JSXAttrName, JSXAttrValue, JSXElement, JSXElementName,
    JSXText, KeyValueProp, Lit, MemberProp, ModuleDecl, ModuleItem, NamedExport, ObjectLit, Prop,
    PropName, PropOrSpread, Stmt, SuperProp, SwitchCase, TaggedTpl, TsEnumDecl, TsType,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::context::TransformContext;
use crate::core::edits::{Edit, EditSet};
use crate::core::markup::heuristics::is_url_like;
use crate::core::provider::{CallScope, Quote, TranslationProvider};
use crate::core::script::parser::ParsedScript;
use crate::core::types::{MatchKind, TextMatch};

/// Calls whose arguments are identifiers, event names or module paths.
const STRUCTURAL_CALLEES: &[&str] = &[
    "require",
    "defineProps",
    "defineEmits",
    "defineOptions",
    "emit",
    "$emit",
    "this.$emit",
];

/// Calls whose first object argument is an options-style component.
const COMPONENT_FACTORIES: &[&str] = &["defineComponent", "Vue.extend", "Vue.component"];

/// JSX attributes that never carry user-facing text.
const JSX_ATTRIBUTE_DENYLIST: &[&str] = &[
    "className", "class", "key", "ref", "id", "style", "href", "src", "type", "name", "htmlFor",
];

/// Payload of one script edit.
#[derive(Debug, Clone, Default)]
pub struct ScriptEdit {
    pub matches: Vec<TextMatch>,
    /// The replacement contains a module-scope call (`t(...)`).
    pub module_scope: bool,
}

/// An initializer of a declaration directly in the module body, eligible
/// for the reactive wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapTarget {
    /// Range replaced by the wrapped expression.
    pub outer: (usize, usize),
    /// The literal-like expression that ends up inside the wrapper.
    pub inner: (usize, usize),
}

pub struct LiteralCollector<'a> {
    ctx: &'a TransformContext,
    parsed: &'a ParsedScript,
    source: &'a str,
    pub edits: EditSet<ScriptEdit>,
    pub wrap_targets: Vec<WrapTarget>,
    scope: CallScope,
}

impl<'a> LiteralCollector<'a> {
    pub fn new(ctx: &'a TransformContext, parsed: &'a ParsedScript, source: &'a str) -> Self {
        Self {
            ctx,
            parsed,
            source,
            edits: EditSet::new(),
            wrap_targets: Vec::new(),
            scope: CallScope::Module,
        }
    }

    pub fn collect(mut self) -> (EditSet<ScriptEdit>, Vec<WrapTarget>) {
        let parsed = self.parsed;
        for item in &parsed.module.body {
            let var = match item {
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                    Decl::Var(var) => var,
                    _ => continue,
                },
                _ => continue,
            };
            for init in var.decls.iter().filter_map(|decl| decl.init.as_deref()) {
                self.register_wrap_target(init);
            }
        }
        parsed.module.visit_with(&mut self);
        (self.edits, self.wrap_targets)
    }

    fn range(&self, span: Span) -> (usize, usize) {
        self.parsed.range(span)
    }

    fn with_scope(&mut self, scope: CallScope, f: impl FnOnce(&mut Self)) {
        let prev = self.scope;
        self.scope = scope;
        f(self);
        self.scope = prev;
    }

    /// Record a replacement of `start..end` by a translation call for `text`.
    /// `wrap` formats the rendered call, e.g. into `{t('k')}` for JSX.
    fn record(
        &mut self,
        (start, end): (usize, usize),
        text: &str,
        text_offset: usize,
        kind: MatchKind,
        quote: Quote,
        wrap: fn(String) -> String,
    ) {
        let Some(found) = self.ctx.matcher.resolve(text) else {
            return;
        };
        let call = self.ctx.provider.call_for(&found.key, self.scope);
        let module_scope = self.scope == CallScope::Module;
        self.edits.push(
            Edit::replace(start, end, wrap(call.render(quote))),
            ScriptEdit {
                matches: vec![TextMatch::new(text, found.key, kind, found.origin, text_offset)],
                module_scope,
            },
        );
    }

    /// Quote style of the literal at `start`, reused for the key literal.
    fn quote_at(&self, start: usize) -> Quote {
        match self.source[start..].chars().next() {
            Some('"') => Quote::Double,
            _ => Quote::Single,
        }
    }

    /// Rewrite `expr` if it is a string or substitution-free template literal;
    /// otherwise keep walking.
    fn visit_expr_as(&mut self, expr: &Expr, kind: MatchKind) {
        match expr {
            Expr::Lit(Lit::Str(s)) => {
                if let Some(text) = s.value.as_str() {
                    let range = self.range(s.span);
                    let quote = self.quote_at(range.0);
                    self.record(range, text, range.0 + 1, kind, quote, |call| call);
                }
            }
            Expr::Tpl(tpl) if tpl.exprs.is_empty() && tpl.quasis.len() == 1 => {
                let text = tpl.quasis[0].cooked.as_ref().and_then(|c| c.as_str());
                if let Some(text) = text {
                    let range = self.range(tpl.span);
                    let kind = if kind == MatchKind::StringLiteral {
                        MatchKind::TemplateLiteral
                    } else {
                        kind
                    };
                    self.record(range, text, range.0 + 1, kind, Quote::Single, |call| call);
                }
            }
            _ => expr.visit_children_with(self),
        }
    }

    /// Walk an options-style component object. Plain values (name, props
    /// defaults) stay untouched; function bodies run in instance scope,
    /// except `setup` which runs in module scope.
    fn visit_component_object(&mut self, obj: &ObjectLit) {
        for prop in &obj.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            match &**prop {
                Prop::Method(method) => {
                    let scope = component_member_scope(&method.key);
                    self.with_scope(scope, |this| method.function.visit_with(this));
                }
                Prop::Getter(getter) => {
                    self.with_scope(CallScope::Instance, |this| getter.body.visit_with(this));
                }
                Prop::Setter(setter) => {
                    self.with_scope(CallScope::Instance, |this| setter.body.visit_with(this));
                }
                Prop::KeyValue(kv) => match &*kv.value {
                    Expr::Fn(_) | Expr::Arrow(_) => {
                        let scope = component_member_scope(&kv.key);
                        self.with_scope(scope, |this| kv.value.visit_with(this));
                    }
                    Expr::Object(inner) => self.visit_component_object(inner),
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn uses_component_scopes(&self) -> bool {
        self.ctx.provider.supports_scoped_calls()
    }

    fn register_wrap_target(&mut self, init: &Expr) {
        if !self.ctx.wrap_reactive || self.ctx.provider.reactive_wrapper().is_none() {
            return;
        }
        let inner = match init {
            Expr::Call(call) if is_literal_like_primitive_call(call, self.ctx) => {
                call.args.first().map(|arg| self.range(expr_span(&arg.expr)))
            }
            expr if is_literal_like(expr) => Some(self.range(expr_span(expr))),
            _ => None,
        };
        if let Some(inner) = inner {
            self.wrap_targets.push(WrapTarget {
                outer: self.range(expr_span(init)),
                inner,
            });
        }
    }
}

/// `setup` belongs to the module scope (it calls composables), every other
/// component member to the instance.
fn component_member_scope(key: &PropName) -> CallScope {
    match key {
        PropName::Ident(ident) if &*ident.sym == "setup" => CallScope::Module,
        _ => CallScope::Instance,
    }
}

fn expr_span(expr: &Expr) -> Span {
    swc_common::Spanned::span(expr)
}

/// Dotted path of a callee: `t`, `this.$t`, `i18n.global.t`.
pub fn expr_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => Some(format!("{}.{}", expr_path(&member.obj)?, prop.sym)),
            _ => None,
        },
        Expr::Paren(paren) => expr_path(&paren.expr),
        _ => None,
    }
}

fn callee_path(call: &CallExpr) -> Option<String> {
    match &call.callee {
        Callee::Expr(expr) => expr_path(expr),
        _ => None,
    }
}

/// String literal, substitution-free template, array or object literal.
fn is_literal_like(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(Lit::Str(_)) | Expr::Array(_) | Expr::Object(_) => true,
        Expr::Tpl(tpl) => tpl.exprs.is_empty(),
        _ => false,
    }
}

/// `ref('text')`, `reactive({...})` with a single literal-like argument.
fn is_literal_like_primitive_call(call: &CallExpr, ctx: &TransformContext) -> bool {
    let Some(callee) = callee_path(call) else {
        return false;
    };
    ctx.is_reactive_primitive(&callee)
        && call.args.len() == 1
        && call.args[0].spread.is_none()
        && is_literal_like(&call.args[0].expr)
}

fn is_comparison(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::EqEq
            | BinaryOp::NotEq
            | BinaryOp::EqEqEq
            | BinaryOp::NotEqEq
            | BinaryOp::In
            | BinaryOp::InstanceOf
    )
}

impl Visit for LiteralCollector<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        self.visit_expr_as(node, MatchKind::StringLiteral);
    }

    fn visit_array_lit(&mut self, node: &ArrayLit) {
        for elem in node.elems.iter().flatten() {
            if elem.spread.is_none() {
                self.visit_expr_as(&elem.expr, MatchKind::ArrayElement);
            } else {
                elem.visit_with(self);
            }
        }
    }

    fn visit_key_value_prop(&mut self, node: &KeyValueProp) {
        self.visit_expr_as(&node.value, MatchKind::ObjectProperty);
    }

    // Keys and computed member names are identifiers, not text.
    fn visit_prop_name(&mut self, _node: &PropName) {}

    fn visit_member_prop(&mut self, _node: &MemberProp) {}

    fn visit_super_prop(&mut self, _node: &SuperProp) {}

    fn visit_import_decl(&mut self, _node: &ImportDecl) {}

    fn visit_named_export(&mut self, node: &NamedExport) {
        if node.src.is_none() {
            node.visit_children_with(self);
        }
    }

    fn visit_export_all(&mut self, _node: &ExportAll) {}

    fn visit_ts_type(&mut self, _node: &TsType) {}

    fn visit_ts_enum_decl(&mut self, _node: &TsEnumDecl) {}

    fn visit_tagged_tpl(&mut self, _node: &TaggedTpl) {}

    fn visit_expr_stmt(&mut self, node: &ExprStmt) {
        // Bare string statements are directives ("use strict").
        if matches!(&*node.expr, Expr::Lit(Lit::Str(_))) {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_bin_expr(&mut self, node: &BinExpr) {
        if !is_comparison(node.op) {
            node.visit_children_with(self);
            return;
        }
        for side in [&node.left, &node.right] {
            if !matches!(&**side, Expr::Lit(Lit::Str(_)) | Expr::Tpl(_)) {
                side.visit_with(self);
            }
        }
    }

    fn visit_switch_case(&mut self, node: &SwitchCase) {
        node.cons.visit_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        match &node.callee {
            Callee::Import(_) => return,
            Callee::Expr(callee) => {
                if let Some(path) = expr_path(callee) {
                    if self.ctx.provider.is_translation_callee(&path)
                        || STRUCTURAL_CALLEES.contains(&path.as_str())
                    {
                        return;
                    }
                    if self.uses_component_scopes()
                        && COMPONENT_FACTORIES.contains(&path.as_str())
                        && let Some(first) = node.args.first()
                        && let Expr::Object(obj) = &*first.expr
                    {
                        self.visit_component_object(obj);
                        for arg in node.args.iter().skip(1) {
                            arg.visit_with(self);
                        }
                        return;
                    }
                }
            }
            Callee::Super(_) => {}
        }
        node.visit_children_with(self);
    }

    fn visit_export_default_expr(&mut self, node: &ExportDefaultExpr) {
        if self.uses_component_scopes()
            && let Expr::Object(obj) = &*node.expr
        {
            self.visit_component_object(obj);
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_jsx_element(&mut self, node: &JSXElement) {
        if let JSXElementName::Ident(ident) = &node.opening.name
            && self.ctx.is_interpolation_component(&ident.sym)
        {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_jsx_text(&mut self, node: &JSXText) {
        let (start, end) = self.range(node.span);
        let raw = &self.source[start..end];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let trimmed_start = start + (raw.len() - raw.trim_start().len());
        let trimmed_end = trimmed_start + trimmed.len();
        self.record(
            (trimmed_start, trimmed_end),
            trimmed,
            trimmed_start,
            MatchKind::JsxText,
            Quote::Single,
            |call| format!("{{{}}}", call),
        );
    }

    fn visit_jsx_attr(&mut self, node: &JSXAttr) {
        let JSXAttrName::Ident(name) = &node.name else {
            return;
        };
        if JSX_ATTRIBUTE_DENYLIST.contains(&&*name.sym) || name.sym.starts_with("data-") {
            return;
        }
        match &node.value {
            Some(JSXAttrValue::Str(s)) => {
                if let Some(text) = s.value.as_str()
                    && !is_url_like(text)
                {
                    let range = self.range(s.span);
                    self.record(
                        range,
                        text,
                        range.0 + 1,
                        MatchKind::JsxAttribute,
                        Quote::Single,
                        |call| format!("{{{}}}", call),
                    );
                }
            }
            Some(value) => value.visit_with(self),
            None => {}
        }
    }
}
