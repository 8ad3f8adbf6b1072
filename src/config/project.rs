//! Project configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the optional configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// Project-wide configuration shared by every site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    // Directory
    pub sites_dir: String,
    pub templates_dir: String,
    pub public_dir: String,

    // URL
    /// Prefix every site is served under
    pub root: String,

    // Server
    pub host: String,
    pub port: u16,

    // Writing
    pub post_list_title: String,
    pub untitled_post: String,
    pub untitled_page: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            sites_dir: "sites".to_string(),
            templates_dir: "templates".to_string(),
            public_dir: "public".to_string(),

            root: "/".to_string(),

            host: "127.0.0.1".to_string(),
            port: 8080,

            post_list_title: "All Posts".to_string(),
            untitled_post: "Untitled Post".to_string(),
            untitled_page: "Untitled Page".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration from YAML text. An empty document yields the defaults.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `_config.yml` from the base directory, falling back to the defaults
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Address the server listens on
    pub fn listen_addr(&self) -> String {
        let host = if self.host == "localhost" {
            "127.0.0.1"
        } else {
            &self.host
        };
        format!("{}:{}", host, self.port)
    }
}
