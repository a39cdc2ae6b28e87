use std::path::PathBuf;

use crate::core::TransformResult;
use crate::locales::LocaleScanWarning;

#[derive(Debug)]
pub enum CommandSummary {
    Transform(TransformSummary),
    Init(InitSummary),
}

/// Outcome of one file in a transform run.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Path as shown to the user (relative to the working directory when possible).
    pub display_path: String,
    /// `None` when the file could not be read.
    pub result: Option<TransformResult>,
    /// Read or write failure.
    pub io_error: Option<String>,
    pub changed: bool,
    pub written: bool,
}

impl FileOutcome {
    pub fn match_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.matches.len())
    }

    pub fn error_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.errors.len()) + usize::from(self.io_error.is_some())
    }
}

#[derive(Debug, Default)]
pub struct TransformSummary {
    /// Sorted by path.
    pub files: Vec<FileOutcome>,
    pub is_apply: bool,
    pub locale_files_loaded: usize,
    pub locale_warnings: Vec<LocaleScanWarning>,
    /// Generated keys added to the primary locale file.
    pub keys_written: usize,
    pub skipped_paths: usize,
}

impl TransformSummary {
    pub fn match_count(&self) -> usize {
        self.files.iter().map(FileOutcome::match_count).sum()
    }

    pub fn changed_count(&self) -> usize {
        self.files.iter().filter(|f| f.changed).count()
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running an i18nify command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Fragment, read and write errors. Any error makes the exit status 1.
    pub error_count: usize,
}

impl CommandResult {
    pub fn init(created: bool) -> Self {
        Self {
            summary: CommandSummary::Init(InitSummary { created }),
            error_count: usize::from(!created),
        }
    }

    pub fn transform(summary: TransformSummary) -> Self {
        let error_count = summary.files.iter().map(FileOutcome::error_count).sum();
        Self {
            summary: CommandSummary::Transform(summary),
            error_count,
        }
    }
}
