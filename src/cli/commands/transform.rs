use std::{
    collections::{HashMap, HashSet},
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::debug;

use super::super::args::TransformCommand;
use super::super::files::scan_files;
use super::{CommandResult, FileOutcome, TransformSummary};
use crate::config::{Config, load_config};
use crate::core::{FileKind, LocaleMap, MatchOrigin, TransformContext, transform_with_context};
use crate::locales::{load_locale_dir, write_generated_keys};

pub fn transform(cmd: TransformCommand) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    run_in(&cwd, &cmd)
}

/// Run a transform with `cwd` as the working directory.
pub fn run_in(cwd: &Path, cmd: &TransformCommand) -> Result<CommandResult> {
    let loaded = load_config(cwd)?;
    let base_dir = loaded.base_dir(cwd);
    let mut config = loaded.config;
    cmd.common.apply_to(&mut config);
    config.validate()?;

    let locales_dir = base_dir.join(&config.locales_root);
    let scan = load_locale_dir(&locales_dir, &config.primary_locale)?;
    let locales = Arc::new(scan.locales);

    let roots: Vec<String> = if cmd.paths.is_empty() {
        config.includes.clone()
    } else {
        cmd.paths
            .iter()
            .map(|p| cwd.join(p).to_string_lossy().to_string())
            .collect()
    };
    let files = scan_files(&base_dir, &roots, &config.ignores, cmd.common.verbose);
    debug!(files = files.files.len(), skipped = files.skipped_count, "scanned source files");

    let contexts = build_contexts(&config, &locales, &files.files)?;

    let mut outcomes: Vec<FileOutcome> = files
        .files
        .par_iter()
        .filter_map(|path| {
            let kind = FileKind::from_path(path)?;
            let ctx = contexts.get(&kind)?;
            Some(process_file(cwd, path, ctx, cmd.apply))
        })
        .collect();
    outcomes.sort_by(|a, b| a.path.cmp(&b.path));

    let keys_written = if cmd.write_locales {
        let entries = generated_entries(&outcomes);
        let primary_file = locales_dir.join(format!("{}.json", config.primary_locale));
        if entries.is_empty() {
            0
        } else {
            write_generated_keys(&primary_file, &entries)?
        }
    } else {
        0
    };

    Ok(CommandResult::transform(TransformSummary {
        files: outcomes,
        is_apply: cmd.apply,
        locale_files_loaded: scan.files.len(),
        locale_warnings: scan.warnings,
        keys_written,
        skipped_paths: files.skipped_count,
    }))
}

/// One context per file kind, so files of a kind share a match cache.
fn build_contexts(
    config: &Config,
    locales: &Arc<LocaleMap>,
    files: &[PathBuf],
) -> Result<HashMap<FileKind, TransformContext>> {
    let kinds: HashSet<FileKind> = files.iter().filter_map(FileKind::from_path).collect();
    kinds
        .into_iter()
        .map(|kind| -> Result<(FileKind, TransformContext)> {
            let options = config.transform_options(Arc::clone(locales), kind);
            Ok((kind, TransformContext::new(&options)?))
        })
        .collect()
}

fn process_file(cwd: &Path, path: &Path, ctx: &TransformContext, apply: bool) -> FileOutcome {
    let display_path = path
        .strip_prefix(cwd)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    let mut outcome = FileOutcome {
        path: path.to_path_buf(),
        display_path,
        result: None,
        io_error: None,
        changed: false,
        written: false,
    };

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            outcome.io_error = Some(format!("Failed to read file: {}", e));
            return outcome;
        }
    };

    let result = transform_with_context(&source, ctx);
    outcome.changed = result.code != source;
    if apply && outcome.changed {
        match fs::write(path, &result.code) {
            Ok(()) => outcome.written = true,
            Err(e) => outcome.io_error = Some(format!("Failed to write file: {}", e)),
        }
    }
    outcome.result = Some(result);
    outcome
}

/// `(key, text)` of every generated match, first occurrence wins.
fn generated_entries(outcomes: &[FileOutcome]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    outcomes
        .iter()
        .filter(|outcome| outcome.written)
        .filter_map(|outcome| outcome.result.as_ref())
        .flat_map(|result| &result.matches)
        .filter(|m| m.origin == MatchOrigin::Generated)
        .filter(|m| seen.insert(m.key.clone()))
        .map(|m| (m.key.clone(), m.text.clone()))
        .collect()
}
