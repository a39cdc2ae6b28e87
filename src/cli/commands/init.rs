use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::CommandResult;
use crate::config::{CONFIG_FILE_NAME, default_config_json};

/// Write the default config into `dir`. An existing file is left alone and
/// reported as a failure.
pub fn init(dir: &Path) -> Result<CommandResult> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Ok(CommandResult::init(false));
    }

    let content = default_config_json()?;
    fs::write(&config_path, format!("{}\n", content))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(CommandResult::init(true))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::cli::commands::CommandSummary;
    use crate::config::Config;

    #[test]
    fn test_init_creates_default_config() {
        let dir = tempdir().unwrap();
        let result = init(dir.path()).unwrap();
        assert_eq!(result.error_count, 0);

        let content = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let config: Config = serde_json::from_str(&content).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{}").unwrap();

        let result = init(dir.path()).unwrap();
        assert_eq!(result.error_count, 1);
        assert!(matches!(
            result.summary,
            CommandSummary::Init(ref summary) if !summary.created
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
