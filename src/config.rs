use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use serde::Deserialize;

use crate::rules::RuleTable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder names excluded in addition to the built-in ones.
    pub extra_folders: Vec<String>,
    /// File suffixes excluded in addition to the built-in ones.
    pub extra_extensions: Vec<String>,
    /// Release JSON to compare the running version against.
    pub release_feed: Option<String>,
}

impl Config {
    pub fn rules(&self) -> RuleTable {
        RuleTable::with_extras(&self.extra_folders, &self.extra_extensions)
    }
}

pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".config/js-packager/config.toml")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
    load_from(&default_path())
}

/// Reads the config file. A missing file means defaults and is never created.
pub fn load_from(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if !path.exists() {
        log::debug!("no config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    let config = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} failed to parse {}: {e}",
                style("warning:").yellow().bold(),
                path.display()
            );
            Config::default()
        }
    };

    Ok(config)
}
