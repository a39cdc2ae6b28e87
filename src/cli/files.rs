use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::core::FileKind;

/// Patterns without `*` or `?` are literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning for transformable files.
pub struct ScanResult {
    /// Sorted and deduplicated.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Collect transformable files under `roots`, relative to `base_dir`.
///
/// Roots may be directories, single files or glob patterns. `ignores` are
/// glob patterns matched against the full path, or literal path prefixes.
pub fn scan_files(
    base_dir: &Path,
    roots: &[String],
    ignores: &[String],
    verbose: bool,
) -> ScanResult {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn(verbose, format!("Invalid ignore pattern '{}': {}", p, e)),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let mut paths_to_scan: Vec<PathBuf> = Vec::new();
    for root in roots {
        if is_glob_pattern(root) {
            let full_pattern = base_dir.join(root);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => paths_to_scan.extend(entries.flatten()),
                Err(e) => warn(verbose, format!("Invalid glob pattern '{}': {}", root, e)),
            }
        } else {
            let path = base_dir.join(root);
            if path.exists() {
                paths_to_scan.push(path);
            } else {
                warn(verbose, format!("Path does not exist: {}", path.display()));
            }
        }
    }

    for root in paths_to_scan {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn(verbose, format!("Cannot access path: {}", e));
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && FileKind::from_path(path).is_some() {
                files.insert(path.to_path_buf());
            }
        }
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

fn warn(verbose: bool, message: String) {
    if verbose {
        eprintln!("{} {}", "warning:".bold().yellow(), message);
    }
}
