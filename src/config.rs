use crate::defaults;
use crate::dictionary::{ColorPalette, ModifierMap, SpacingScale, ValueDictionary};
use crate::error::ConfigurationError;
use crate::plugin::GenerationPriority;
use crate::rule_bag::PropertyMap;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const TEMPLATE_MARKER: &str = "/* %GENERATED% */";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub marker: String,
    pub custom_stylesheet: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub content: Vec<String>,
    pub ignore: Vec<String>,
    pub purge: bool,
    pub minify: bool,
    pub theme: Theme,
    pub plugins: Vec<PluginEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: TEMPLATE_MARKER.to_string(),
            custom_stylesheet: None,
            output: None,
            content: Vec::new(),
            ignore: Vec::new(),
            purge: false,
            minify: false,
            theme: Theme::default(),
            plugins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub prefix: String,
    pub spacing: SpacingScale,
    pub colors: ColorPalette,
    pub modifiers: ModifierMap,
    pub border_radius: ValueDictionary<String, String>,
    pub border_width: ValueDictionary<String, String>,
    pub font_size: ValueDictionary<String, String>,
    pub opacity: ValueDictionary<String, String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            spacing: defaults::spacing().clone(),
            colors: defaults::colors().clone(),
            modifiers: defaults::modifiers().clone(),
            border_radius: defaults::border_radius().clone(),
            border_width: defaults::border_width().clone(),
            font_size: defaults::font_size().clone(),
            opacity: defaults::opacity().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginEntry {
    pub namespace: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<GenerationPriority>,
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub options: Option<toml::Value>,
    #[serde(default)]
    pub rules: Option<IndexMap<String, PropertyMap>>,
}

fn default_enabled() -> bool {
    true
}

pub fn load(path: &Path) -> Result<Config, ConfigurationError> {
    let text = fs::read_to_string(path).map_err(|err| ConfigurationError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let config = parse(&text).map_err(|message| ConfigurationError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    validate(&config)?;
    Ok(config)
}

pub fn parse(text: &str) -> Result<Config, String> {
    toml::from_str(text).map_err(|err| err.message().to_string())
}

pub fn validate(config: &Config) -> Result<(), ConfigurationError> {
    if config.marker.is_empty() {
        return Err(ConfigurationError::EmptyMarker);
    }
    let mut seen = HashSet::new();
    for entry in &config.plugins {
        if !seen.insert(entry.namespace.as_str()) {
            return Err(ConfigurationError::DuplicateNamespace(
                entry.namespace.clone(),
            ));
        }
    }
    Ok(())
}

pub fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    config_path
        .parent()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|| path.to_path_buf())
}
