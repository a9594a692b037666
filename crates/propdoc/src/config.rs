//! Package-level configuration
//!
//! Read from an optional `propdoc.toml` at the package root. Every field
//! has a default, so a package without the file behaves like the reakit
//! layout: sources under `src/`, prop tables under `## Props`.

use crate::diagnostics::{PropdocError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the package root
pub const CONFIG_FILE: &str = "propdoc.toml";

/// Documentation build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Source directory, relative to the package root
    pub source_dir: PathBuf,
    /// Title of the README heading that receives prop tables
    pub props_heading: String,
    /// File name of generated key modules
    pub keys_file: String,
    /// Whether `@private` props are documented
    pub include_private: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            props_heading: "Props".to_string(),
            keys_file: "__keys.ts".to_string(),
            include_private: false,
        }
    }
}

impl DocsConfig {
    /// Parse configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| PropdocError::config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
    }

    /// Load `propdoc.toml` from a package root, falling back to defaults
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            debug!(root = %root.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Absolute source directory for a package root
    pub fn source_path(&self, root: &Path) -> PathBuf {
        root.join(&self.source_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DocsConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("src"));
        assert_eq!(config.props_heading, "Props");
        assert_eq!(config.keys_file, "__keys.ts");
        assert!(!config.include_private);
    }

    #[test]
    fn test_partial_file() {
        let config = DocsConfig::from_toml("props_heading = \"API\"\ninclude_private = true\n").unwrap();
        assert_eq!(config.props_heading, "API");
        assert!(config.include_private);
        assert_eq!(config.keys_file, "__keys.ts");
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let result = DocsConfig::from_toml("heading = \"Props\"");
        assert!(matches!(result, Err(PropdocError::Config(_))));
    }

    #[test]
    fn test_load() {
        let dir = TempDir::new().unwrap();
        assert_eq!(DocsConfig::load(dir.path()).unwrap(), DocsConfig::default());

        std::fs::write(dir.path().join(CONFIG_FILE), "source_dir = \"lib-src\"\n").unwrap();
        let config = DocsConfig::load(dir.path()).unwrap();
        assert_eq!(config.source_path(dir.path()), dir.path().join("lib-src"));
    }
}
