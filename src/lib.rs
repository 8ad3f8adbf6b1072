//! blog-rs: a minimal static site generator
//!
//! Wraps HTML fragments from per-site `posts` and `pages` directories in a
//! shared template set, writes them to an output directory, and serves the
//! result with clean URLs.

pub mod assets;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod server;
pub mod site;
pub mod templates;

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use site::Site;

/// The main application: a project holding one or more sites
#[derive(Debug, Clone)]
pub struct Blog {
    /// Project configuration
    pub config: config::ProjectConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding one source directory per site
    pub sites_dir: PathBuf,
    /// Template directory
    pub templates_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new instance from a base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::ProjectConfig::load_or_default(&base_dir)?;
        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::ProjectConfig) -> Self {
        let sites_dir = base_dir.join(&config.sites_dir);
        let templates_dir = base_dir.join(&config.templates_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            sites_dir,
            templates_dir,
            public_dir,
        }
    }

    /// Look up a site by name. Its source directory must exist.
    pub fn site(&self, name: &str) -> Result<Site> {
        let site = Site::new(name, &self.sites_dir, &self.public_dir)?;

        let metadata = fs::metadata(&site.source_dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow!("site directory '{}' does not exist", site.source_dir.display())
            } else {
                anyhow!(
                    "failed to access site directory '{}': {}",
                    site.source_dir.display(),
                    e
                )
            }
        })?;
        if !metadata.is_dir() {
            return Err(anyhow!(
                "path '{}' is not a directory",
                site.source_dir.display()
            ));
        }

        Ok(site)
    }

    /// Every site under the sites directory, sorted by name
    pub fn sites(&self) -> Result<Vec<Site>> {
        let entries = fs::read_dir(&self.sites_dir).with_context(|| {
            format!("failed to read sites directory {}", self.sites_dir.display())
        })?;

        let mut sites = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping site with non UTF-8 name {:?}", entry.path());
                continue;
            };
            match Site::new(&name, &self.sites_dir, &self.public_dir) {
                Ok(site) => sites.push(site),
                Err(e) => tracing::warn!("Skipping site {:?}: {}", entry.path(), e),
            }
        }
        sites.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(sites)
    }

    /// One named site, or all of them
    pub fn select_sites(&self, name: Option<&str>) -> Result<Vec<Site>> {
        match name {
            Some(name) => Ok(vec![self.site(name)?]),
            None => self.sites(),
        }
    }

    /// Build one site, or every site when `name` is `None`
    pub fn build(&self, name: Option<&str>) -> Result<Vec<generator::BuildSummary>> {
        commands::build::run(self, name)
    }

    /// Remove generated output
    pub fn clean(&self, name: Option<&str>) -> Result<()> {
        commands::clean::run(self, name)
    }
}
