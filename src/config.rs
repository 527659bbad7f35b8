use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path};

use crate::error::LoamError;

/// Standard config filename looked up at the corpus root.
pub const CONFIG_NAME: &str = "loam.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub background: String,
    pub text_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            primary_color: "#007acc".to_string(),
            background: "#1e1e1e".to_string(),
            text_color: "#d4d4d4".to_string(),
        }
    }
}

/// Site-wide build settings, deserialized from `loam.toml` at the corpus
/// root. Every field has a default; a missing file means a default config,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_title: String,
    pub site_description: String,
    /// Base URL for sitemap and canonical URLs (e.g.
    /// <https://username.github.io/notes>). No sitemap is generated without
    /// it.
    pub base_url: Option<String>,
    /// Link-distance radius of per-page neighborhood graph views.
    pub graph_depth: usize,
    /// Maximum character length of search-result preview text.
    pub search_preview_length: usize,
    pub enable_tags: bool,
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site_title: "Loam Notes".to_string(),
            site_description: "A knowledge garden built with loam".to_string(),
            base_url: None,
            graph_depth: 2,
            search_preview_length: 500,
            enable_tags: true,
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml(content: &str) -> Result<SiteConfig, LoamError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `loam.toml` from the corpus root, falling back to defaults when
    /// the file does not exist. A file that exists but fails to parse is a
    /// configuration error, not a silent default.
    pub fn discover(root: &Path) -> Result<SiteConfig, LoamError> {
        let path = root.join(CONFIG_NAME);
        tracing::debug!("Attempting to read site config from: {:?}", &path);
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(SiteConfig::default());
        }
        SiteConfig::from_toml(&read_to_string(&path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.graph_depth, 2);
        assert_eq!(config.search_preview_length, 500);
        assert!(config.enable_tags);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_partial_toml_overlays_defaults() {
        let config = SiteConfig::from_toml(
            r##"
site_title = "My Garden"
graph_depth = 3

[theme]
primary_color = "#00a86b"
"##,
        )
        .unwrap();
        assert_eq!(config.site_title, "My Garden");
        assert_eq!(config.graph_depth, 3);
        assert_eq!(config.theme.primary_color, "#00a86b");
        // Untouched fields keep their defaults.
        assert_eq!(config.search_preview_length, 500);
        assert_eq!(config.theme.background, "#1e1e1e");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(SiteConfig::from_toml("site_title = [broken").is_err());
    }
}
