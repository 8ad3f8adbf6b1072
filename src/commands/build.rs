//! Build sites

use anyhow::Result;

use crate::generator::{BuildSummary, Generator};
use crate::Blog;

/// Build one site, or every site when `name` is `None`.
///
/// A single site links against the root; building every site links each
/// one under `/<site>/`, matching how `serve` routes them.
pub fn run(blog: &Blog, name: Option<&str>) -> Result<Vec<BuildSummary>> {
    let start = std::time::Instant::now();

    let sites = blog.select_sites(name)?;
    if sites.is_empty() {
        tracing::warn!("No sites found in {:?}", blog.sites_dir);
        return Ok(Vec::new());
    }

    let generator = Generator::new(blog)?.multi_site(name.is_none());

    let mut summaries = Vec::with_capacity(sites.len());
    for site in &sites {
        summaries.push(generator.generate(site)?);
    }

    tracing::info!(
        "Built {} site(s) in {:.2}s",
        sites.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(summaries)
}
