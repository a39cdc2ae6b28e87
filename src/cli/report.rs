//! Report formatting and printing.
//!
//! Text output is cargo-style and colored; JSON output is a single document
//! on stdout. Kept apart from the engine so i18nify can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::args::OutputFormat;
use super::commands::{CommandResult, CommandSummary, FileOutcome, InitSummary, TransformSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{MatchOrigin, TextMatch, TransformError};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Quoted text wider than this is cut with an ellipsis.
const MAX_TEXT_WIDTH: usize = 40;

pub fn print(result: &CommandResult, format: OutputFormat, verbose: bool) {
    match format {
        OutputFormat::Text => print_to(result, verbose, &mut io::stdout().lock()),
        OutputFormat::Json => print_json_to(result, &mut io::stdout().lock()),
    }
}

/// Print a command result as text to a custom writer.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Transform(summary) => print_transform(summary, verbose, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    let msg = if summary.created {
        format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        )
    } else {
        format!(
            "{} {}",
            FAILURE_MARK.red(),
            format!("{} already exists", CONFIG_FILE_NAME).red()
        )
    };
    let _ = writeln!(writer, "{}", msg);
}

fn print_transform<W: Write>(summary: &TransformSummary, verbose: bool, writer: &mut W) {
    print_locale_warnings(summary, verbose, writer);

    for file in &summary.files {
        print_file(file, writer);
    }

    print_summary(summary, writer);
}

fn print_locale_warnings<W: Write>(summary: &TransformSummary, verbose: bool, writer: &mut W) {
    if summary.locale_warnings.is_empty() {
        return;
    }
    if verbose {
        for warning in &summary.locale_warnings {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                "warning:".bold().yellow(),
                warning.file_path,
                warning.error
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} locale file(s) could not be loaded (use {} for details)",
            "warning:".bold().yellow(),
            summary.locale_warnings.len(),
            "-v".cyan()
        );
    }
}

fn print_file<W: Write>(file: &FileOutcome, writer: &mut W) {
    let matches = file.result.as_ref().map_or(&[][..], |r| &r.matches[..]);
    let errors = file.result.as_ref().map_or(&[][..], |r| &r.errors[..]);
    if matches.is_empty() && errors.is_empty() && file.io_error.is_none() {
        return;
    }

    if !matches.is_empty() {
        let _ = writeln!(writer, "{}", file.display_path.bold());
        let location_width = matches
            .iter()
            .map(|m| location(m).len())
            .max()
            .unwrap_or(0);
        let text_width = matches
            .iter()
            .map(|m| UnicodeWidthStr::width(quoted(&m.text).as_str()))
            .max()
            .unwrap_or(0);
        for m in matches {
            print_match(m, location_width, text_width, writer);
        }
    }

    for error in errors {
        print_error(&error.to_string(), &file.display_path, writer);
    }
    if let Some(error) = &file.io_error {
        print_error(error, &file.display_path, writer);
    }
}

fn print_match<W: Write>(m: &TextMatch, location_width: usize, text_width: usize, writer: &mut W) {
    let text = quoted(&m.text);
    // Pad by display width so CJK text lines up.
    let padding = text_width.saturating_sub(UnicodeWidthStr::width(text.as_str()));
    let generated = if m.origin == MatchOrigin::Generated {
        format!(" {}", "(generated)".yellow())
    } else {
        String::new()
    };
    let _ = writeln!(
        writer,
        "  {:<lw$}  {}{:pad$}  {} {}  {}{}",
        location(m).blue(),
        text,
        "",
        "->".dimmed(),
        m.key.green(),
        m.kind.to_string().dimmed().cyan(),
        generated,
        lw = location_width,
        pad = padding,
    );
}

fn print_error<W: Write>(message: &str, path: &str, writer: &mut W) {
    let _ = writeln!(writer, "{}: {}", "error".bold().red(), message);
    let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
}

fn print_summary<W: Write>(summary: &TransformSummary, writer: &mut W) {
    let files = summary.files.len();
    let matches = summary.match_count();
    let changed = summary.changed_count();
    let errors: usize = summary.files.iter().map(FileOutcome::error_count).sum();

    if matches == 0 && errors == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} - nothing to transform",
                files,
                plural(files, "file", "files")
            )
            .green()
        );
        return;
    }

    let _ = writeln!(writer);
    let line = if summary.is_apply {
        format!(
            "Replaced {} {} in {} {}",
            matches,
            plural(matches, "string", "strings"),
            changed,
            plural(changed, "file", "files")
        )
    } else {
        format!(
            "Found {} translatable {} in {} of {} {}",
            matches,
            plural(matches, "string", "strings"),
            changed,
            files,
            plural(files, "file", "files")
        )
    };
    let mark = if errors > 0 {
        FAILURE_MARK.red()
    } else {
        SUCCESS_MARK.green()
    };
    let _ = writeln!(writer, "{} {}", mark, line.bold());

    if errors > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} left unchanged",
            "error:".bold().red(),
            errors,
            plural(errors, "fragment or file", "fragments or files")
        );
    }
    if summary.keys_written > 0 {
        let _ = writeln!(
            writer,
            "{} Added {} generated {} to the primary locale file",
            SUCCESS_MARK.green(),
            summary.keys_written,
            plural(summary.keys_written, "key", "keys")
        );
    }
    if !summary.is_apply && changed > 0 {
        let _ = writeln!(
            writer,
            "{} run with {} to write the changes",
            "hint:".bold().cyan(),
            "--apply".cyan()
        );
    }
}

fn location(m: &TextMatch) -> String {
    format!("{}:{}", m.line.unwrap_or(0), m.col.unwrap_or(0))
}

fn quoted(text: &str) -> String {
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > MAX_TEXT_WIDTH {
            out.push('…');
            break;
        }
        width += w;
        out.push(c);
    }
    format!("\"{}\"", out.replace('\n', " "))
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: Vec<JsonFile<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFile<'a> {
    path: &'a str,
    changed: bool,
    written: bool,
    matches: &'a [TextMatch],
    errors: &'a [TransformError],
    #[serde(skip_serializing_if = "Option::is_none")]
    io_error: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    files: usize,
    changed: usize,
    matches: usize,
    errors: usize,
    applied: bool,
    keys_written: usize,
}

/// Print a command result as JSON to a custom writer.
pub fn print_json_to<W: Write>(result: &CommandResult, writer: &mut W) {
    let json = match &result.summary {
        CommandSummary::Transform(summary) => {
            let report = JsonReport {
                files: summary
                    .files
                    .iter()
                    .map(|file| JsonFile {
                        path: &file.display_path,
                        changed: file.changed,
                        written: file.written,
                        matches: file.result.as_ref().map_or(&[][..], |r| &r.matches[..]),
                        errors: file.result.as_ref().map_or(&[][..], |r| &r.errors[..]),
                        io_error: file.io_error.as_deref(),
                    })
                    .collect(),
                summary: JsonSummary {
                    files: summary.files.len(),
                    changed: summary.changed_count(),
                    matches: summary.match_count(),
                    errors: result.error_count,
                    applied: summary.is_apply,
                    keys_written: summary.keys_written,
                },
            };
            serde_json::to_string_pretty(&report)
        }
        CommandSummary::Init(summary) => {
            serde_json::to_string_pretty(&serde_json::json!({ "created": summary.created }))
        }
    };
    match json {
        Ok(json) => {
            let _ = writeln!(writer, "{}", json);
        }
        Err(e) => {
            let _ = writeln!(writer, "{}", e);
        }
    }
}
