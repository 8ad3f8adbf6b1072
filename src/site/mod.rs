//! Sites - named groups of content sharing one template set

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a site name is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteNameError {
    #[error("site name is empty")]
    Empty,

    #[error("site name '{0}' is a relative path component")]
    Relative(String),

    #[error("site name '{0}' contains a path separator")]
    Separator(String),
}

/// Check that a name can be used as a single directory component
pub fn validate_site_name(name: &str) -> Result<(), SiteNameError> {
    if name.is_empty() {
        return Err(SiteNameError::Empty);
    }
    if name == "." || name == ".." {
        return Err(SiteNameError::Relative(name.to_string()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(SiteNameError::Separator(name.to_string()));
    }
    Ok(())
}

/// A site and the directories it is built from and into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Site name (directory name under the sites directory)
    pub name: String,
    /// Source directory (`<sites>/<name>`)
    pub source_dir: PathBuf,
    /// Output directory (`<public>/<name>`)
    pub output_dir: PathBuf,
}

impl Site {
    /// Create a site rooted in the given sites and public directories
    pub fn new(name: &str, sites_dir: &Path, public_dir: &Path) -> Result<Self, SiteNameError> {
        validate_site_name(name)?;
        Ok(Self {
            name: name.to_string(),
            source_dir: sites_dir.join(name),
            output_dir: public_dir.join(name),
        })
    }

    /// `<source>/content`
    pub fn content_dir(&self) -> PathBuf {
        self.source_dir.join("content")
    }

    /// `<source>/content/posts`
    pub fn posts_dir(&self) -> PathBuf {
        self.content_dir().join("posts")
    }

    /// `<source>/content/pages`
    pub fn pages_dir(&self) -> PathBuf {
        self.content_dir().join("pages")
    }

    /// `<source>/static`
    pub fn static_dir(&self) -> PathBuf {
        self.source_dir.join("static")
    }

    /// `<output>/static`
    pub fn static_output_dir(&self) -> PathBuf {
        self.output_dir.join("static")
    }
}
