//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `transform`: Rewrite hard-coded text into translation calls (dry-run by default)
//! - `init`: Initialize the i18nify configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::core::ProviderKind;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Transform(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Flags that override `.i18nifyrc.json`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Translation library to target (default: inferred per file type)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Locales directory (overrides config file)
    #[arg(long)]
    pub locales_root: Option<PathBuf>,

    /// Primary locale (overrides config file)
    #[arg(long)]
    pub primary_locale: Option<String>,

    /// Leave script code untouched
    #[arg(long)]
    pub no_script: bool,

    /// Leave template markup untouched
    #[arg(long)]
    pub no_template: bool,

    /// Do not wrap top-level declarations in a reactive wrapper
    #[arg(long)]
    pub no_wrap: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.provider = Some(provider);
        }
        if let Some(root) = &self.locales_root {
            config.locales_root = root.to_string_lossy().to_string();
        }
        if let Some(primary) = &self.primary_locale {
            config.primary_locale = primary.clone();
        }
        if self.no_script {
            config.transform_script = false;
        }
        if self.no_template {
            config.transform_template = false;
        }
        if self.no_wrap {
            config.wrap_reactive = false;
        }
        if self.verbose {
            config.debug = true;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct TransformCommand {
    /// Files or directories to transform (default: config `includes`)
    pub paths: Vec<PathBuf>,

    /// Write transformed files (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Add generated keys to the primary locale file (requires --apply)
    #[arg(long, requires = "apply")]
    pub write_locales: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite hard-coded text into translation calls
    Transform(TransformCommand),
    /// Initialize a new .i18nifyrc.json configuration file
    Init,
}
