use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::context::{DEFAULT_INTERPOLATION_COMPONENTS, DEFAULT_REACTIVE_PRIMITIVES};
use crate::core::{
    FileKind, ImportDeclaration, KeyGeneratorFn, LocaleMap, ProviderKind, TransformOptions,
    VanillaProvider, provider_for, slug_key,
};
use crate::utils::contains_alphabetic;

pub const CONFIG_FILE_NAME: &str = ".i18nifyrc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_locales_root")]
    pub locales_root: String,
    #[serde(default = "default_primary_locale")]
    pub primary_locale: String,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// `None` picks a provider per file kind.
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default = "default_true")]
    pub transform_script: bool,
    #[serde(default = "default_true")]
    pub transform_template: bool,
    #[serde(default = "default_true")]
    pub wrap_reactive: bool,
    #[serde(default = "default_reactive_primitives")]
    pub reactive_primitives: Vec<String>,
    #[serde(default = "default_interpolation_components")]
    pub interpolation_components: Vec<String>,
    #[serde(default)]
    pub vanilla: VanillaConfig,
    /// Enables key generation for unmatched text, under this prefix.
    #[serde(default)]
    pub generated_key_prefix: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VanillaConfig {
    #[serde(default = "default_function_name")]
    pub function_name: String,
    #[serde(default)]
    pub import_source: Option<String>,
    #[serde(default)]
    pub import_name: Option<String>,
}

impl Default for VanillaConfig {
    fn default() -> Self {
        Self {
            function_name: default_function_name(),
            import_source: None,
            import_name: None,
        }
    }
}

fn default_locales_root() -> String {
    "./locales".to_string()
}

fn default_primary_locale() -> String {
    "en".to_string()
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_reactive_primitives() -> Vec<String> {
    DEFAULT_REACTIVE_PRIMITIVES.iter().map(|s| s.to_string()).collect()
}

fn default_interpolation_components() -> Vec<String> {
    DEFAULT_INTERPOLATION_COMPONENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_function_name() -> String {
    "i18n.t".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locales_root: default_locales_root(),
            primary_locale: default_primary_locale(),
            includes: default_includes(),
            ignores: Vec::new(),
            provider: None,
            transform_script: true,
            transform_template: true,
            wrap_reactive: true,
            reactive_primitives: default_reactive_primitives(),
            interpolation_components: default_interpolation_components(),
            vanilla: VanillaConfig::default(),
            generated_key_prefix: None,
            debug: false,
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.primary_locale.trim().is_empty() {
            bail!("'primaryLocale' must not be empty");
        }

        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.vanilla.function_name.trim().is_empty() {
            bail!("'vanilla.functionName' must not be empty");
        }
        if self.vanilla.import_name.is_some() && self.vanilla.import_source.is_none() {
            bail!("'vanilla.importName' requires 'vanilla.importSource'");
        }

        Ok(())
    }

    pub fn vanilla_provider(&self) -> VanillaProvider {
        let import = self.vanilla.import_source.as_ref().map(|source| {
            let name = self
                .vanilla
                .import_name
                .clone()
                .unwrap_or_else(|| callee_root(&self.vanilla.function_name).to_string());
            ImportDeclaration::new(source.as_str(), &[name.as_str()])
        });
        VanillaProvider {
            function_name: self.vanilla.function_name.clone(),
            import,
        }
    }

    pub fn key_generator(&self) -> Option<KeyGeneratorFn> {
        self.generated_key_prefix.clone().map(|prefix| {
            let generator: KeyGeneratorFn = Arc::new(move |text: &str| {
                contains_alphabetic(text).then(|| slug_key(&prefix, text))
            });
            generator
        })
    }

    /// Options for transforming one file of `kind`.
    pub fn transform_options(&self, locales: Arc<LocaleMap>, kind: FileKind) -> TransformOptions {
        TransformOptions {
            generator: self.key_generator(),
            transform_script: self.transform_script,
            transform_template: self.transform_template,
            wrap_reactive: self.wrap_reactive,
            reactive_primitives: self.reactive_primitives.clone(),
            interpolation_components: self.interpolation_components.clone(),
            provider: self
                .provider
                .map(|kind| provider_for(kind, &self.vanilla_provider())),
            debug: self.debug,
            ..TransformOptions::new(locales, kind)
        }
    }
}

/// `i18n.t` -> `i18n`
fn callee_root(function_name: &str) -> &str {
    function_name.split('.').next().unwrap_or(function_name)
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Where the config came from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    /// Directory relative config paths resolve against.
    pub fn base_dir(&self, cwd: &Path) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::core::TranslationProvider;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.locales_root, "./locales");
        assert_eq!(config.primary_locale, "en");
        assert_eq!(config.includes, vec!["src"]);
        assert!(config.ignores.is_empty());
        assert!(config.provider.is_none());
        assert!(config.wrap_reactive);
        assert_eq!(config.vanilla.function_name, "i18n.t");
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "localesRoot": "./i18n",
              "provider": "react",
              "ignores": ["**/dist/**"],
              "wrapReactive": false,
              "vanilla": { "functionName": "translate" }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.locales_root, "./i18n");
        assert_eq!(config.provider, Some(ProviderKind::React));
        assert_eq!(config.ignores, vec!["**/dist/**"]);
        assert!(!config.wrap_reactive);
        assert!(config.transform_script);
        assert_eq!(config.vanilla.function_name, "translate");
        assert_eq!(config.reactive_primitives, default_reactive_primitives());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let json = r#"{ "provider": "angular" }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        assert_eq!(find_config_file(&sub_dir), Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignores": ["**/test/**"] }"#,
        )
        .unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.path.is_some());
        assert_eq!(result.base_dir(Path::new("/elsewhere")), dir.path());
        assert_eq!(result.config.ignores, vec!["**/test/**"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.path.is_none());
        assert_eq!(result.config, Config::default());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_include_pattern() {
        let config = Config {
            includes: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("includes"));
    }

    #[test]
    fn test_validate_import_name_needs_source() {
        let mut config = Config::default();
        config.vanilla.import_name = Some("i18n".to_string());
        assert!(config.validate().is_err());

        config.vanilla.import_source = Some("@/i18n".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_primary_locale() {
        let config = Config {
            primary_locale: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_vanilla_import_defaults_to_callee_root() {
        let mut config = Config::default();
        config.vanilla.import_source = Some("@/i18n".to_string());
        let provider = config.vanilla_provider();
        assert_eq!(
            provider.import_declarations(),
            Some(vec![ImportDeclaration::new("@/i18n", &["i18n"])])
        );
    }

    #[test]
    fn test_key_generator_uses_prefix() {
        let config = Config {
            generated_key_prefix: Some("auto".to_string()),
            ..Default::default()
        };
        let generator = config.key_generator().unwrap();
        assert_eq!(generator("Welcome back!").as_deref(), Some("auto.welcome_back"));
        assert_eq!(generator("100%"), None);
        assert_eq!(generator("#fff000"), Some("auto.fff000".to_string()));
        assert_eq!(generator("-- 42 --"), None);
        assert!(Config::default().key_generator().is_none());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"localesRoot\": \"./locales\""));
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
