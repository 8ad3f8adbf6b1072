//! List site content

use anyhow::Result;

use crate::content::{self, ContentItem, ContentKind};
use crate::generator::path_exists;
use crate::Blog;

/// Load a site's posts and pages without rendering them
pub fn collect(blog: &Blog, name: &str) -> Result<(Vec<ContentItem>, Vec<ContentItem>)> {
    let site = blog.site(name)?;

    let posts = if path_exists(&site.posts_dir())? {
        content::load_dir(&site.posts_dir(), ContentKind::Post, &blog.config.untitled_post)?
    } else {
        Vec::new()
    };
    let pages = if path_exists(&site.pages_dir())? {
        content::load_dir(&site.pages_dir(), ContentKind::Page, &blog.config.untitled_page)?
    } else {
        Vec::new()
    };

    Ok((posts, pages))
}

/// Print a site's posts and pages
pub fn run(blog: &Blog, name: &str) -> Result<()> {
    let (posts, pages) = collect(blog, name)?;

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("  {} [{}]", post.title, post.slug);
    }
    println!("Pages ({}):", pages.len());
    for page in &pages {
        println!("  {} [{}]", page.title, page.slug);
    }

    Ok(())
}
