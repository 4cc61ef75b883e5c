//! Settings infrastructure.
//!
//! This module loads `settings.toml` files that switch individual features on
//! or off and declare which alternate languages each language-block element
//! (`style`, `script`, `template`) can be written in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Names accepted for elements and alternate languages.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid name pattern"));

/// Alternates used when `settings.toml` does not mention an element.
const DEFAULT_LANGUAGES: &[(&str, &[&str])] = &[
    ("style", &["less", "scss", "sass", "stylus", "postcss"]),
    ("script", &["ts"]),
    ("template", &["pug"]),
];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid language '{lang}' for <{element}>")]
    InvalidLanguage { element: String, lang: String },
}

/// Root settings structure loaded from settings.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Feature switches.
    pub html: Option<HtmlSettings>,

    /// Alternate languages per language-block element.
    /// An empty list disables synthetic items for that element.
    pub languages: Option<HashMap<String, Vec<AlternateSetting>>>,
}

/// Feature switches; anything left out stays enabled.
#[derive(Debug, Default, Deserialize)]
pub struct HtmlSettings {
    pub hover: Option<bool>,
    pub completions: Option<bool>,
    pub tag_complete: Option<bool>,
}

/// One alternate language, either `"less"` or `{ lang = "less", fragment = ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AlternateSetting {
    Lang(String),
    Detailed {
        lang: String,
        /// Attribute text inserted after the element name.
        fragment: Option<String>,
    },
}

/// Which entry points are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub hover: bool,
    pub completions: bool,
    pub tag_complete: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            hover: true,
            completions: true,
            tag_complete: true,
        }
    }
}

/// An alternate language for a language-block element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageAlternate {
    pub lang: String,
    /// Attribute text inserted on selection, e.g. `lang="less"`.
    pub fragment: String,
}

impl LanguageAlternate {
    pub fn new(lang: impl Into<String>) -> Self {
        let lang = lang.into();
        let fragment = format!("lang=\"{}\"", lang);
        Self { lang, fragment }
    }
}

/// Alternate languages keyed by element name, each list free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageBlocks {
    blocks: HashMap<String, Vec<LanguageAlternate>>,
}

impl LanguageBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alternate; repeats of the same language are ignored.
    pub fn insert(&mut self, element: &str, alternate: LanguageAlternate) {
        let alternates = self.blocks.entry(element.to_ascii_lowercase()).or_default();
        if !alternates.iter().any(|a| a.lang == alternate.lang) {
            alternates.push(alternate);
        }
    }

    pub fn with(mut self, element: &str, lang: &str) -> Self {
        self.insert(element, LanguageAlternate::new(lang));
        self
    }

    /// Alternates for `element`, in configuration order.
    pub fn alternates(&self, element: &str) -> &[LanguageAlternate] {
        self.blocks.get(element).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.values().all(Vec::is_empty)
    }

    fn clear(&mut self, element: &str) {
        self.blocks.insert(element.to_ascii_lowercase(), Vec::new());
    }
}

/// Resolved configuration handed to the dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub features: Features,
    pub language_blocks: LanguageBlocks,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            features: Features::default(),
            language_blocks: default_language_blocks(),
        }
    }
}

pub fn default_language_blocks() -> LanguageBlocks {
    let mut blocks = LanguageBlocks::new();
    for (element, langs) in DEFAULT_LANGUAGES {
        for lang in *langs {
            blocks.insert(element, LanguageAlternate::new(*lang));
        }
    }
    blocks
}

fn resolve_alternate(
    element: &str,
    setting: &AlternateSetting,
) -> Result<LanguageAlternate, SettingsError> {
    let (lang, fragment) = match setting {
        AlternateSetting::Lang(lang) => (lang, None),
        AlternateSetting::Detailed { lang, fragment } => (lang, fragment.as_ref()),
    };
    if !NAME_PATTERN.is_match(element) || !NAME_PATTERN.is_match(lang) {
        return Err(SettingsError::InvalidLanguage {
            element: element.to_string(),
            lang: lang.clone(),
        });
    }
    let mut alternate = LanguageAlternate::new(lang.as_str());
    if let Some(fragment) = fragment {
        alternate.fragment = fragment.clone();
    }
    Ok(alternate)
}

/// Resolve raw settings into the configuration used by the plugin.
///
/// Invalid alternates are skipped with a warning.
pub fn build_config(settings: &Settings) -> PluginConfig {
    let mut config = PluginConfig::default();

    if let Some(ref html) = settings.html {
        let defaults = Features::default();
        config.features = Features {
            hover: html.hover.unwrap_or(defaults.hover),
            completions: html.completions.unwrap_or(defaults.completions),
            tag_complete: html.tag_complete.unwrap_or(defaults.tag_complete),
        };
    }

    if let Some(ref languages) = settings.languages {
        for (element, alternates) in languages {
            config.language_blocks.clear(element);
            for setting in alternates {
                match resolve_alternate(element, setting) {
                    Ok(alternate) => config.language_blocks.insert(element, alternate),
                    Err(e) => warn!("skipping language alternate: {}", e),
                }
            }
        }
    }

    config
}

/// Read and parse a settings file.
pub fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from a settings.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match read_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Io { .. }) => Settings::default(),
        Err(e) => {
            warn!("{}", e);
            Settings::default()
        }
    }
}

/// Discover settings.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)`; when nothing is found the settings are
/// the defaults and `settings_dir` is `start_dir`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    for dir in start_dir.ancestors() {
        let candidate = dir.join("settings.toml");
        if candidate.is_file() {
            debug!(path = %candidate.display(), "found settings");
            return (load_settings(&candidate), dir.to_path_buf());
        }
    }

    if let Ok(entries) = std::fs::read_dir(start_dir) {
        let mut children: Vec<PathBuf> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect();
        // read_dir order is platform dependent.
        children.sort();
        for child in children {
            let candidate = child.join("settings.toml");
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found settings");
                return (load_settings(&candidate), child);
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Settings {
        toml::from_str(content).unwrap()
    }

    fn langs(config: &PluginConfig, element: &str) -> Vec<String> {
        config
            .language_blocks
            .alternates(element)
            .iter()
            .map(|a| a.lang.clone())
            .collect()
    }

    #[test]
    fn defaults() {
        let config = build_config(&Settings::default());
        assert_eq!(config.features, Features::default());
        assert_eq!(langs(&config, "style"), ["less", "scss", "sass", "stylus", "postcss"]);
        assert_eq!(langs(&config, "script"), ["ts"]);
        assert_eq!(
            config.language_blocks.alternates("style")[0].fragment,
            "lang=\"less\""
        );
        assert!(config.language_blocks.alternates("div").is_empty());
    }

    #[test]
    fn feature_switches() {
        let settings = parse("[html]\ncompletions = false\n");
        let config = build_config(&settings);
        assert!(config.features.hover);
        assert!(!config.features.completions);
        assert!(config.features.tag_complete);
    }

    #[test]
    fn languages_replace_defaults_per_element() {
        let settings = parse(
            r#"
[languages]
style = ["scss", "scss", { lang = "postcss", fragment = "lang=\"postcss\" global" }]
script = []
"#,
        );
        let config = build_config(&settings);
        assert_eq!(langs(&config, "style"), ["scss", "postcss"]);
        assert_eq!(
            config.language_blocks.alternates("style")[1].fragment,
            "lang=\"postcss\" global"
        );
        assert!(langs(&config, "script").is_empty());
        assert_eq!(langs(&config, "template"), ["pug"]);
    }

    #[test]
    fn invalid_languages_are_skipped() {
        let settings = parse("[languages]\nstyle = [\"le\\\"ss\", \"less\", \"\"]\n");
        let config = build_config(&settings);
        assert_eq!(langs(&config, "style"), ["less"]);
    }

    #[test]
    fn resolve_alternate_reports_invalid_names() {
        let err = resolve_alternate("style", &AlternateSetting::Lang("a b".into())).unwrap_err();
        assert_eq!(err.to_string(), "invalid language 'a b' for <style>");
    }

    #[test]
    fn read_settings_reports_parse_errors() {
        let dir = make_test_dir("parse-error");
        let path = dir.join("settings.toml");
        std::fs::write(&path, "[html\n").unwrap();

        assert!(matches!(read_settings(&path), Err(SettingsError::Parse { .. })));
        assert!(load_settings(&path).html.is_none());

        cleanup_test_dir(&dir);
    }

    /// Create a unique temp directory for test isolation.
    fn make_test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("svelte-html-lsp-test")
            .join(name)
            .join(format!("{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup_test_dir(dir: &Path) {
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn discover_settings_in_parent_dir() {
        let parent = make_test_dir("discover-parent");
        let child = parent.join("src");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(parent.join("settings.toml"), "[html]\nhover = false\n").unwrap();

        let (settings, settings_dir) = discover_settings(&child);
        assert_eq!(settings_dir, parent);
        assert_eq!(settings.html.unwrap().hover, Some(false));

        cleanup_test_dir(&parent);
    }

    #[test]
    fn discover_settings_in_child_dir() {
        let parent = make_test_dir("discover-child");
        let child = parent.join("config");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(child.join("settings.toml"), "[languages]\nstyle = [\"less\"]\n").unwrap();

        let (settings, settings_dir) = discover_settings(&parent);
        assert_eq!(settings_dir, child);
        assert!(settings.languages.unwrap().contains_key("style"));

        cleanup_test_dir(&parent);
    }

    #[test]
    fn discover_settings_not_found() {
        let dir = make_test_dir("discover-none");

        let (settings, settings_dir) = discover_settings(&dir);
        assert_eq!(settings_dir, dir);
        assert!(settings.html.is_none());
        assert!(settings.languages.is_none());

        cleanup_test_dir(&dir);
    }
}
