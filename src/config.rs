//! Configuration file support
//!
//! Loads settings from ~/.hilite.toml (or %USERPROFILE%\.hilite.toml on
//! Windows).
//!
//! Example:
//! ```text
//! # hilite configuration
//! class-prefix = "hljs-"
//! languages = ["xml", "css", "javascript"]
//! ```

use std::fs;
use std::path::PathBuf;

use toml::Table;

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Class prefix for classified spans
    pub class_prefix: String,
    /// Restrict auto-detection to these languages
    pub languages: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_prefix: "hljs-".to_string(),
            languages: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".hilite.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".hilite.toml"))
        }
    }

    /// Load configuration from file
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = fs::read_to_string(&path) {
                if let Ok(table) = contents.parse::<Table>() {
                    config.apply(&table);
                }
            }
        }

        config
    }

    /// Apply settings from a parsed table
    fn apply(&mut self, table: &Table) {
        if let Some(value) = table.get("class-prefix").and_then(|v| v.as_str()) {
            self.class_prefix = value.to_string();
        }

        if let Some(values) = table.get("languages").and_then(|v| v.as_array()) {
            let languages: Vec<String> = values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            if !languages.is_empty() {
                self.languages = Some(languages);
            }
        }
    }
}
