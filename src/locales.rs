//! Locale files on disk.
//!
//! A locale directory holds one `<lang>.json` file per language. Loading turns
//! it into a [`LocaleMap`]; write-back adds generated keys to the primary
//! language file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::LocaleMap;

/// A locale file that could not be used.
#[derive(Debug, Clone)]
pub struct LocaleScanWarning {
    pub file_path: String,
    pub error: String,
}

#[derive(Debug)]
pub struct LocaleScanResult {
    pub locales: LocaleMap,
    /// Files that were loaded, in language order.
    pub files: Vec<PathBuf>,
    pub warnings: Vec<LocaleScanWarning>,
}

/// Extracts the language tag from a locale file name.
///
/// - "en.json" -> Some("en")
/// - "/path/to/locales/zh-CN.json" -> Some("zh-CN")
pub fn extract_locale(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

pub fn parse_locale_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {:?}", path))?;
    if !json.is_object() {
        bail!("Root of locale file must be an object: {:?}", path);
    }
    Ok(json)
}

/// Load every `*.json` file of `dir`.
///
/// The primary language comes first, the rest follow sorted by tag, so a
/// literal present in several languages resolves against the primary one.
/// Unreadable files become warnings; having no usable file at all is an error.
pub fn load_locale_dir(dir: impl AsRef<Path>, primary: &str) -> Result<LocaleScanResult> {
    let dir = dir.as_ref();

    if !dir.exists() {
        bail!(
            "Locales directory '{}' does not exist.\n\
             Hint: Check your .i18nifyrc.json 'localesRoot' setting.",
            dir.display()
        );
    }
    if !dir.is_dir() {
        bail!("'{}' is not a directory.", dir.display());
    }

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json")
            && let Some(locale) = extract_locale(&path)
        {
            candidates.push((locale, path));
        }
    }
    candidates.sort_by(|(a, _), (b, _)| (a != primary, a).cmp(&(b != primary, b)));

    let mut languages = Map::new();
    let mut files = Vec::new();
    let mut warnings = Vec::new();
    for (locale, path) in candidates {
        match parse_locale_file(&path) {
            Ok(tree) => {
                debug!(locale = %locale, path = %path.display(), "loaded locale file");
                languages.insert(locale, tree);
                files.push(path);
            }
            Err(e) => warnings.push(LocaleScanWarning {
                file_path: path.to_string_lossy().to_string(),
                error: format!("{:#}", e),
            }),
        }
    }

    if languages.is_empty() {
        bail!("No usable locale files found in '{}'", dir.display());
    }
    let locales = LocaleMap::new(Value::Object(languages))?;

    Ok(LocaleScanResult {
        locales,
        files,
        warnings,
    })
}

/// Adds keys to one locale file without touching existing entries.
///
/// Output is pretty-printed with 2-space indentation and a trailing newline.
/// Key order is preserved; new keys are appended.
pub struct LocaleWriter {
    file_path: PathBuf,
    data: Map<String, Value>,
}

impl LocaleWriter {
    /// Open an existing locale file or start an empty one.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            match parse_locale_file(path)? {
                Value::Object(map) => map,
                _ => bail!("Root of locale file must be an object: {:?}", path),
            }
        } else {
            Map::new()
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            data,
        })
    }

    /// Insert `value` at a dot-path, creating intermediate objects.
    ///
    /// Returns false when the key already exists or a segment of the path is
    /// taken by a non-object value.
    pub fn insert_missing(&mut self, key: &str, value: &str) -> bool {
        let parts: Vec<&str> = key.split('.').collect();
        insert_nested(&mut self.data, &parts, value)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(self.data.clone()))
            .context("Failed to serialize JSON")?;

        fs::write(&self.file_path, format!("{}\n", content))
            .with_context(|| format!("Failed to write file: {}", self.file_path.display()))?;

        Ok(())
    }
}

fn insert_nested(root: &mut Map<String, Value>, path: &[&str], value: &str) -> bool {
    match path {
        [] => false,
        [key] => {
            if root.contains_key(*key) {
                return false;
            }
            root.insert(key.to_string(), Value::String(value.to_string()));
            true
        }
        [key, rest @ ..] => {
            let next = root
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match next {
                Value::Object(inner) => insert_nested(inner, rest, value),
                _ => false,
            }
        }
    }
}

/// Write `(key, text)` pairs into a locale file. Returns how many were added.
pub fn write_generated_keys(path: &Path, entries: &[(String, String)]) -> Result<usize> {
    let mut writer = LocaleWriter::open_or_create(path)?;
    let added = entries
        .iter()
        .filter(|(key, text)| writer.insert_missing(key, text))
        .count();
    if added > 0 {
        writer.save()?;
    }
    Ok(added)
}
