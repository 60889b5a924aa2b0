//! Locale files, the Tera `t` function and translation-key housekeeping.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

lazy_static! {
    static ref KEY_CALL_RE: Regex = Regex::new(r#"\bt\(\s*key\s*=\s*["']([^"']+)["']\s*[,)]"#)
        .expect("translation call pattern is valid");
}

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid locale file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("default locale `{0}` has no locale file")]
    MissingDefault(String),
}

/// Flattens nested objects into dotted keys; non-string leaves are stringified.
pub fn flatten_keys(value: &Value) -> BTreeMap<String, String> {
    fn walk(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    walk(&path, child, out);
                }
            }
            Value::String(text) => {
                out.insert(prefix.to_string(), text.clone());
            }
            other => {
                out.insert(prefix.to_string(), other.to_string());
            }
        }
    }

    let mut out = BTreeMap::new();
    walk("", value, &mut out);
    out
}

fn read_locale_file(path: &Path) -> Result<BTreeMap<String, String>, I18nError> {
    let raw = fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| I18nError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(flatten_keys(&value))
}

/// Reads every `<lang>.json` file of `dir` keyed by language.
pub fn load_locale_dir(dir: &Path) -> Result<BTreeMap<String, BTreeMap<String, String>>, I18nError> {
    let entries = fs::read_dir(dir).map_err(|source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut locales = BTreeMap::new();
    for entry in entries {
        let path = entry
            .map_err(|source| I18nError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(lang) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        locales.insert(lang.to_string(), read_locale_file(&path)?);
    }
    Ok(locales)
}

/// Loaded translations for every locale.
#[derive(Debug, Clone)]
pub struct Translations {
    default_locale: String,
    locales: BTreeMap<String, BTreeMap<String, String>>,
}

impl Translations {
    pub fn load(dir: &Path, default_locale: &str) -> Result<Self, I18nError> {
        Self::from_locales(load_locale_dir(dir)?, default_locale)
    }

    pub fn from_locales(
        locales: BTreeMap<String, BTreeMap<String, String>>,
        default_locale: &str,
    ) -> Result<Self, I18nError> {
        if !locales.contains_key(default_locale) {
            return Err(I18nError::MissingDefault(default_locale.to_string()));
        }
        log::info!("Loaded {} locale(s)", locales.len());
        Ok(Self {
            default_locale: default_locale.to_string(),
            locales,
        })
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Looks the key up in `locale`, then in the default locale, then returns the key.
    pub fn translate<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        [locale, self.default_locale.as_str()]
            .iter()
            .filter_map(|lang| self.locales.get(*lang))
            .find_map(|messages| messages.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }
}

/// Tera function `t(key="…", lang="…")`.
pub struct TranslateFunction {
    translations: Arc<Translations>,
}

impl TranslateFunction {
    pub fn new(translations: Arc<Translations>) -> Self {
        Self { translations }
    }
}

impl tera::Function for TranslateFunction {
    fn call(&self, args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
        let key = args
            .get("key")
            .and_then(tera::Value::as_str)
            .ok_or_else(|| tera::Error::msg("t() requires a string `key` argument"))?;
        let lang = args
            .get("lang")
            .and_then(tera::Value::as_str)
            .unwrap_or_else(|| self.translations.default_locale());

        Ok(tera::Value::String(
            self.translations.translate(lang, key).to_string(),
        ))
    }

    fn is_safe(&self) -> bool {
        false
    }
}

/// Keys referenced through `t(key="…")` in a template source. Keys built
/// with `~` at render time are not visible here.
pub fn extract_keys(source: &str) -> BTreeSet<String> {
    KEY_CALL_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|key| key.as_str().to_string())
        .collect()
}

/// Keys used in every template below `dir`, recursively.
pub fn collect_template_keys(dir: &Path) -> Result<BTreeSet<String>, I18nError> {
    let entries = fs::read_dir(dir).map_err(|source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut keys = BTreeSet::new();
    for entry in entries {
        let path = entry
            .map_err(|source| I18nError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_dir() {
            keys.extend(collect_template_keys(&path)?);
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("html") {
            let source = fs::read_to_string(&path).map_err(|source| I18nError::Io {
                path: path.clone(),
                source,
            })?;
            keys.extend(extract_keys(&source));
        }
    }
    Ok(keys)
}

/// Set difference between used keys and a locale's keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyDiff {
    /// Used in templates but absent from the locale.
    pub missing: Vec<String>,
    /// Present in the locale but never used.
    pub unused: Vec<String>,
}

impl KeyDiff {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unused.is_empty()
    }
}

pub fn diff_keys<'a, U, A>(used: U, available: A) -> KeyDiff
where
    U: IntoIterator<Item = &'a String>,
    A: IntoIterator<Item = &'a String>,
{
    let used: BTreeSet<&String> = used.into_iter().collect();
    let available: BTreeSet<&String> = available.into_iter().collect();

    KeyDiff {
        missing: used.difference(&available).map(|key| (*key).clone()).collect(),
        unused: available.difference(&used).map(|key| (*key).clone()).collect(),
    }
}
