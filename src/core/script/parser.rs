use swc_common::{
    BytePos, FileName, GLOBALS, Globals, SourceMap, Span, Spanned, comments::SingleThreadedComments,
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ScriptParseError {
    pub message: String,
    pub offset: usize,
}

/// A parsed script fragment. Spans in `module` are absolute positions in a
/// private source map; [`range`](Self::range) converts them to byte offsets in
/// the fragment text.
#[derive(Debug)]
pub struct ParsedScript {
    pub module: Module,
    base: BytePos,
}

impl ParsedScript {
    pub fn range(&self, span: Span) -> (usize, usize) {
        ((span.lo - self.base).0 as usize, (span.hi - self.base).0 as usize)
    }
}

/// Parse a script fragment as TypeScript (a superset of the JavaScript we
/// accept). `jsx` enables inline markup; plain scripts that only parse with
/// markup enabled are retried that way.
pub fn parse_script_source(code: &str, jsx: bool) -> Result<ParsedScript, ScriptParseError> {
    let result = parse_with(code, jsx);
    if jsx || result.is_ok() {
        return result;
    }
    // Keep the error of the syntax that was asked for.
    parse_with(code, true).or(result)
}

fn parse_with(code: &str, tsx: bool) -> Result<ParsedScript, ScriptParseError> {
    GLOBALS.set(&Globals::new(), || {
        let source_map = SourceMap::default();
        let source_file =
            source_map.new_source_file(FileName::Anon.into(), code.to_string());
        let base = source_file.start_pos;

        let syntax = Syntax::Typescript(TsSyntax {
            tsx,
            ..Default::default()
        });
        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), Some(&comments));

        let to_error = |e: swc_ecma_parser::error::Error| ScriptParseError {
            message: e.kind().msg().to_string(),
            offset: e.span().lo.0.saturating_sub(base.0) as usize,
        };

        let module = parser.parse_module().map_err(to_error)?;
        // Recovered errors still mean the fragment is not valid source.
        if let Some(error) = parser.take_errors().into_iter().next() {
            return Err(to_error(error));
        }

        Ok(ParsedScript { module, base })
    })
}
