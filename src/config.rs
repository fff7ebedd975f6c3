//! Configuration loading
//!
//! Settings come from an optional YAML file next to the document:
//!
//! ```yaml
//! entities:
//!   unresolved: marker   # or blank
//!   max_passes: 5
//! logging:
//!   level: warn
//! ```

use crate::entity::EntityOptions;
use crate::error::SitemapError;
use serde::Deserialize;
use std::path::Path;

/// File names probed by [`SitemapConfig::load_default`], in order
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".xml-sitemap.yaml",
    ".xml-sitemap.yml",
    "xml-sitemap.yaml",
    "xml-sitemap.yml",
];

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Entity expansion settings
    pub entities: EntityOptions,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl SitemapConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, SitemapError> {
        let content = std::fs::read_to_string(path).map_err(|e| SitemapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| SitemapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from the first readable default location in
    /// `dir`, falling back to defaults
    pub fn load_default(dir: &Path) -> Self {
        let (config, skipped) = Self::discover(dir);
        for e in skipped {
            tracing::warn!("Ignoring configuration: {}", e);
        }
        config
    }

    /// Like [`SitemapConfig::load_default`], but hands back the candidates
    /// that existed and failed to load instead of logging them
    pub fn discover(dir: &Path) -> (Self, Vec<SitemapError>) {
        let mut skipped = Vec::new();

        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if !candidate.exists() {
                continue;
            }
            match Self::load(&candidate) {
                Ok(config) => return (config, skipped),
                Err(e) => skipped.push(e),
            }
        }

        (Self::default(), skipped)
    }
}
