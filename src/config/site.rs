//! Blog configuration (scripts/config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Top-level configuration, one section per concern
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub blog: BlogConfig,
    pub seo: SeoConfig,
    pub theme: ThemeConfig,
}

/// Site identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub url: String,
    pub description: String,
    pub social: SocialConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Ultraviolet".to_string(),
            url: "https://www.ultraviolet.rs".to_string(),
            description: String::new(),
            social: SocialConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub twitter: String,
    pub github: String,
    pub linkedin: String,
}

/// Blog display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub posts_per_page: usize,
    /// Display format for post dates. Only `%B %d, %Y` is rendered today.
    pub date_format: String,
    /// Words per minute; values <= 0 fall back to 200
    pub reading_speed: i64,
    pub category_colors: BTreeMap<String, String>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        let mut category_colors = BTreeMap::new();
        category_colors.insert("blog".to_string(), "primary".to_string());

        Self {
            posts_per_page: 10,
            date_format: "%B %d, %Y".to_string(),
            reading_speed: 200,
            category_colors,
        }
    }
}

/// SEO defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub default_og_image: String,
    pub twitter_handle: String,
}

/// Theme settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub font_family: String,
    /// Syntax highlighting theme for fenced code blocks
    pub code_theme: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: String::new(),
            font_family: "Roboto Mono, monospace, fallback for Roboto Mono".to_string(),
            code_theme: "github-dark".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Load configuration, falling back to the built-in defaults on any failure
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("config.yml not found or invalid: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Display color for a category, `primary` when unmapped
    pub fn category_color(&self, category: &str) -> String {
        self.blog
            .category_colors
            .get(category)
            .cloned()
            .unwrap_or_else(|| "primary".to_string())
    }
}
