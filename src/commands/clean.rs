//! Clean generated output

use anyhow::{Context, Result};
use std::fs;

use crate::Blog;

/// Remove one site's output directory, or the whole public directory
pub fn run(blog: &Blog, name: Option<&str>) -> Result<()> {
    let target = match name {
        Some(name) => blog.site(name)?.output_dir,
        None => blog.public_dir.clone(),
    };

    if target.exists() {
        fs::remove_dir_all(&target)
            .with_context(|| format!("failed to remove {}", target.display()))?;
        tracing::info!("Deleted: {:?}", target);
    }

    Ok(())
}
