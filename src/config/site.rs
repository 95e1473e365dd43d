//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::DEFAULT_THEME;

/// Main site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    /// strftime pattern for displayed dates
    pub date_format: String,

    // Directory
    pub content_dir: String,
    pub extension: String,
    pub public_dir: String,
    pub static_dir: String,

    // Home page
    pub recent_posts: usize,

    // Navigation
    pub menu: Vec<MenuItem>,
    pub footer_links: Vec<MenuItem>,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Tech Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "ja".to_string(),
            url: "http://localhost:3000".to_string(),
            date_format: "%Y-%m-%d".to_string(),

            content_dir: "content/posts".to_string(),
            extension: "mdx".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            recent_posts: 3,

            menu: vec![MenuItem::new("Home", "/"), MenuItem::new("Blog", "/blog")],
            footer_links: Vec::new(),

            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// A navigation link in the header or footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }

    /// Links leaving the site open in a new tab
    pub fn is_external(&self) -> bool {
        self.path.starts_with("http://") || self.path.starts_with("https://")
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    /// Keep the theme's background colour on code blocks
    pub keep_background: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            keep_background: true,
        }
    }
}

/// Development server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
        }
    }
}
