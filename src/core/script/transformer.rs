//! Rewrites literals in one script fragment into translation calls.
//!
//! Pipeline: parse, collect candidate edits, resolve overlaps, fold edits
//! inside reactive-wrap targets into a single wrapping edit, inject imports
//! and hooks, then apply everything in one pass.

use crate::core::context::TransformContext;
use crate::core::edits::{Edit, EditError, EditSet, apply_edits};
use crate::core::error::{FragmentKind, TransformError};
use crate::core::provider::{ImportDeclaration, TranslationProvider};
use crate::core::script::collector::{LiteralCollector, ScriptEdit, WrapTarget};
use crate::core::script::imports::ModuleBindings;
use crate::core::script::parser::parse_script_source;
use crate::core::types::{FragmentOutput, TextMatch};

pub struct ScriptTransformer<'a> {
    ctx: &'a TransformContext,
}

impl<'a> ScriptTransformer<'a> {
    pub fn new(ctx: &'a TransformContext) -> Self {
        Self { ctx }
    }

    /// Transform one script fragment. Offsets in the returned matches are
    /// relative to `source`.
    pub fn transform(&self, source: &str, jsx: bool) -> FragmentOutput {
        let parsed = match parse_script_source(source, jsx) {
            Ok(parsed) => parsed,
            Err(e) => {
                return FragmentOutput::failed(
                    source,
                    TransformError::fragment_parse(FragmentKind::Script, e.to_string(), source),
                );
            }
        };

        let (mut edits, wrap_targets) = LiteralCollector::new(self.ctx, &parsed, source).collect();
        if edits.is_empty() {
            return FragmentOutput::ok(source.to_string(), Vec::new());
        }
        edits.retain_longest();

        let wrapped = match self.fold_wrap_targets(source, &mut edits, &wrap_targets) {
            Ok(wrapped) => wrapped,
            Err(e) => {
                return FragmentOutput::failed(
                    source,
                    TransformError::internal(FragmentKind::Script, e.to_string()),
                );
            }
        };

        if edits.payloads().any(|payload| payload.module_scope) {
            let bindings = ModuleBindings::scan(&parsed, source);
            let imports = self.required_imports(wrapped);
            let hooks = self.ctx.provider.hook_declarations().unwrap_or_default();
            if let Some(edit) = bindings.injection_edit(&imports, &hooks) {
                edits.push(edit, ScriptEdit::default());
            }
        }

        match edits.apply(source) {
            Ok(code) => {
                let mut matches: Vec<TextMatch> = edits
                    .into_payloads()
                    .into_iter()
                    .flat_map(|payload| payload.matches)
                    .collect();
                matches.sort_by_key(|m| m.offset);
                FragmentOutput::ok(code, matches)
            }
            Err(e) => FragmentOutput::failed(
                source,
                TransformError::internal(FragmentKind::Script, e.to_string()),
            ),
        }
    }

    /// Replace the edits inside each wrap target by one edit wrapping the
    /// rewritten initializer. Returns whether any wrapper was emitted.
    fn fold_wrap_targets(
        &self,
        source: &str,
        edits: &mut EditSet<ScriptEdit>,
        targets: &[WrapTarget],
    ) -> Result<bool, EditError> {
        let Some(wrapper) = self.ctx.provider.reactive_wrapper() else {
            return Ok(false);
        };
        let mut wrapped = false;

        for target in targets {
            let (start, end) = target.inner;
            let inside = edits.take_within(start, end);
            if inside.is_empty() {
                continue;
            }

            let rebased: Vec<Edit> = inside.iter().map(|(edit, _)| edit.rebased(start)).collect();
            let refs: Vec<&Edit> = rebased.iter().collect();
            let rewritten = apply_edits(&source[start..end], &refs)?;

            let mut payload = ScriptEdit::default();
            for (_, part) in inside {
                payload.module_scope |= part.module_scope;
                payload.matches.extend(part.matches);
            }
            edits.push(
                Edit::replace(target.outer.0, target.outer.1, wrapper.wrap(&rewritten)),
                payload,
            );
            wrapped = true;
        }

        Ok(wrapped)
    }

    fn required_imports(&self, wrapped: bool) -> Vec<ImportDeclaration> {
        let mut imports = self.ctx.provider.import_declarations().unwrap_or_default();
        if wrapped
            && let Some(import) = self
                .ctx
                .provider
                .reactive_wrapper()
                .and_then(|wrapper| wrapper.import)
        {
            imports.push(import);
        }
        imports
    }
}
