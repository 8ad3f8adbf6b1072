//! Content item model

use serde::Serialize;
use std::fmt;

/// What an item renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Post,
    Page,
    PostList,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Page => "page",
            ContentKind::PostList => "post_list",
        }
    }

    /// Content template rendered inside the base shell
    pub fn template_name(&self) -> &'static str {
        match self {
            ContentKind::Post => "post.html",
            ContentKind::Page => "page.html",
            ContentKind::PostList => "post_list.html",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single post or page loaded from one fragment file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    /// Title derived from the file name
    pub title: String,

    /// Fragment markup, embedded verbatim
    pub content_html: String,

    /// URL path with a leading `/`
    pub slug: String,

    pub kind: ContentKind,
}

impl ContentItem {
    /// Output file path relative to the site output directory.
    /// The root slug `/` maps to `index.html`.
    pub fn output_file(&self) -> String {
        output_file_for_slug(&self.slug)
    }
}

/// Map a slug to the file it is written to
pub fn output_file_for_slug(slug: &str) -> String {
    if slug == "/" {
        "index.html".to_string()
    } else {
        format!("{}.html", slug.trim_start_matches('/'))
    }
}
