//! Whole-file transform: split, run the markup and script passes, splice.

use tracing::debug;

use crate::core::context::{FileKind, TransformContext, TransformOptions};
use crate::core::error::{FragmentKind, TransformError};
use crate::core::markup::MarkupTransformer;
use crate::core::script::ScriptTransformer;
use crate::core::sfc::split_sfc;
use crate::core::types::{FragmentOutput, TextMatch, TransformResult};
use crate::utils::LineIndex;

/// A region of the file handed to one transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub start: usize,
    pub end: usize,
    pub jsx: bool,
}

/// Transform one file.
///
/// Fails only when `options` carries no usable locale map; everything else is
/// reported through [`TransformResult::errors`].
pub fn transform(
    source: &str,
    options: &TransformOptions,
) -> Result<TransformResult, TransformError> {
    let ctx = TransformContext::new(options)?;
    Ok(transform_with_context(source, &ctx))
}

/// Transform one file with an already validated context. Reusing a context
/// across files shares its match cache.
pub fn transform_with_context(source: &str, ctx: &TransformContext) -> TransformResult {
    let (fragments, mut errors) = split_fragments(source, ctx);

    let (markup, scripts): (Vec<Fragment>, Vec<Fragment>) = fragments
        .into_iter()
        .partition(|fragment| fragment.kind == FragmentKind::Markup);

    let (markup_outputs, script_outputs) = rayon::join(
        || {
            markup
                .iter()
                .map(|fragment| (*fragment, run_markup(ctx, &source[fragment.start..fragment.end])))
                .collect::<Vec<_>>()
        },
        || {
            scripts
                .iter()
                .map(|fragment| {
                    let code = &source[fragment.start..fragment.end];
                    (*fragment, ScriptTransformer::new(ctx).transform(code, fragment.jsx))
                })
                .collect::<Vec<_>>()
        },
    );

    let mut outputs: Vec<(Fragment, FragmentOutput)> =
        markup_outputs.into_iter().chain(script_outputs).collect();
    outputs.sort_by_key(|(fragment, _)| fragment.start);

    let line_index = LineIndex::new(source);
    let mut code = String::with_capacity(source.len());
    let mut matches: Vec<TextMatch> = Vec::new();
    let mut cursor = 0;

    for (fragment, output) in outputs {
        code.push_str(&source[cursor..fragment.start]);
        code.push_str(&output.code);
        cursor = fragment.end;

        if ctx.debug {
            debug!(
                fragment = %fragment.kind,
                start = fragment.start,
                end = fragment.end,
                matches = output.matches.len(),
                failed = output.error.is_some(),
                "transformed fragment"
            );
        }

        for mut text_match in output.matches {
            text_match.offset += fragment.start;
            let (line, col) = line_index.line_col(source, text_match.offset);
            text_match.line = Some(line);
            text_match.col = Some(col);
            matches.push(text_match);
        }
        if let Some(error) = output.error {
            if ctx.debug {
                debug!(fragment = %fragment.kind, error = %error, "fragment kept unchanged");
            }
            errors.push(error);
        }
    }
    code.push_str(&source[cursor..]);

    TransformResult {
        code,
        matches,
        errors,
    }
}

fn run_markup(ctx: &TransformContext, code: &str) -> FragmentOutput {
    match MarkupTransformer::new(ctx) {
        Ok(transformer) => transformer.transform(code),
        Err(error) => FragmentOutput::failed(code, error),
    }
}

/// Fragments enabled for this run, in file order, plus errors from splitting.
fn split_fragments(source: &str, ctx: &TransformContext) -> (Vec<Fragment>, Vec<TransformError>) {
    let mut fragments = Vec::new();
    let mut errors = Vec::new();

    match ctx.kind {
        FileKind::Vue => {
            let sfc = split_sfc(source);
            if ctx.transform_template
                && let Some(template) = &sfc.template
            {
                fragments.push(Fragment {
                    kind: FragmentKind::Markup,
                    start: template.start,
                    end: template.end,
                    jsx: false,
                });
            }
            if ctx.transform_script {
                for script in &sfc.scripts {
                    fragments.push(Fragment {
                        kind: FragmentKind::Script,
                        start: script.start,
                        end: script.end,
                        jsx: script.is_jsx(),
                    });
                }
            }
            errors.extend(sfc.errors.into_iter().filter(|error| match error.fragment() {
                Some(FragmentKind::Markup) => ctx.transform_template,
                Some(FragmentKind::Script) => ctx.transform_script,
                None => true,
            }));
        }
        FileKind::Script { jsx } => {
            if ctx.transform_script {
                fragments.push(Fragment {
                    kind: FragmentKind::Script,
                    start: 0,
                    end: source.len(),
                    jsx,
                });
            }
        }
        FileKind::Markup => {
            if ctx.transform_template {
                fragments.push(Fragment {
                    kind: FragmentKind::Markup,
                    start: 0,
                    end: source.len(),
                    jsx: false,
                });
            }
        }
    }

    fragments.sort_by_key(|fragment| fragment.start);
    (fragments, errors)
}
