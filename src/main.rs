use std::{env, process::ExitCode};

use clap::Parser;
use i18nify::cli::{Arguments, ExitStatus};
use i18nify::config::load_config;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Arguments::parse();
    let debug = args.verbose()
        || env::current_dir()
            .ok()
            .and_then(|cwd| load_config(&cwd).ok())
            .is_some_and(|loaded| loaded.config.debug);
    init_tracing(debug);

    match i18nify::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(debug: bool) {
    let default_level = if debug { "i18nify=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
