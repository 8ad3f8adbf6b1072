//! Fixed template set rendered with the Tera template engine
//!
//! Every output page is a two-level composition: the content template for
//! the item kind (`post.html`, `page.html` or `post_list.html`) is rendered
//! first, then `base.html` wraps the result, available to it as `body`.
//! `base.html` is expected to include `header.html`.
//!
//! `root` is the URL prefix the site is served under (`/` or `/<site>/`);
//! templates build links as `{{ root }}static/...`.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

use crate::content::{ContentItem, ContentKind};

/// Shell template every page is rendered through
pub const BASE_TEMPLATE: &str = "base.html";

/// All template files a template directory must provide
pub const TEMPLATE_NAMES: [&str; 5] = [
    BASE_TEMPLATE,
    "header.html",
    "post.html",
    "page.html",
    "post_list.html",
];

/// Parsed template set shared by every item of a build
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    /// Load and parse all templates from a directory
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let files: Vec<_> = TEMPLATE_NAMES
            .iter()
            .map(|name| (dir.join(name), Some(*name)))
            .collect();

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_template_files(files)
            .with_context(|| format!("failed to parse templates in {}", dir.display()))?;

        tracing::debug!("Loaded templates from {:?}", dir);
        Ok(Self { tera })
    }

    /// Build a template set from in-memory sources
    pub fn from_raw(templates: &[(&str, &str)]) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(templates.to_vec())
            .context("failed to parse templates")?;
        Ok(Self { tera })
    }

    /// Render one post or page
    pub fn render_item(&self, item: &ContentItem, root: &str) -> Result<String> {
        let data = RenderContext {
            root,
            title: &item.title,
            slug: &item.slug,
            kind: item.kind,
            content_html: &item.content_html,
            posts: &[],
        };
        self.render(&data)
    }

    /// Render the aggregate list of all posts
    pub fn render_post_list(
        &self,
        title: &str,
        posts: &[ContentItem],
        root: &str,
    ) -> Result<String> {
        let data = RenderContext {
            root,
            title,
            slug: "/posts",
            kind: ContentKind::PostList,
            content_html: "",
            posts,
        };
        self.render(&data)
    }

    fn render(&self, data: &RenderContext<'_>) -> Result<String> {
        let mut context = Context::from_serialize(data)?;
        let body = self.tera.render(data.kind.template_name(), &context)?;
        context.insert("body", &body);
        Ok(self.tera.render(BASE_TEMPLATE, &context)?)
    }
}

/// Data exposed to the templates
#[derive(Debug, Serialize)]
struct RenderContext<'a> {
    root: &'a str,
    title: &'a str,
    slug: &'a str,
    kind: ContentKind,
    content_html: &'a str,
    posts: &'a [ContentItem],
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;

    pub(crate) const DEFAULT_TEMPLATES: [(&str, &str); 5] = [
        ("base.html", include_str!("../../templates/base.html")),
        ("header.html", include_str!("../../templates/header.html")),
        ("post.html", include_str!("../../templates/post.html")),
        ("page.html", include_str!("../../templates/page.html")),
        ("post_list.html", include_str!("../../templates/post_list.html")),
    ];

    /// Minimal templates that make the composition easy to assert on
    pub(crate) const TEST_TEMPLATES: [(&str, &str); 5] = [
        ("base.html", "<title>{{ title }}</title>{% include \"header.html\" %}{{ body }}"),
        ("header.html", "[header]"),
        ("post.html", "<post>{{ content_html }}</post>"),
        ("page.html", "<page>{{ content_html }}</page>"),
        (
            "post_list.html",
            "<list>{% for post in posts %}{{ post.slug }}={{ post.title }};{% endfor %}</list>",
        ),
    ];

    pub(crate) fn write_templates(dir: &Path, templates: &[(&str, &str)]) {
        fs::create_dir_all(dir).unwrap();
        for (name, source) in templates {
            fs::write(dir.join(name), source).unwrap();
        }
    }

    fn item(kind: ContentKind, slug: &str, title: &str, html: &str) -> ContentItem {
        ContentItem {
            title: title.to_string(),
            content_html: html.to_string(),
            slug: slug.to_string(),
            kind,
        }
    }

    #[test]
    fn test_render_dispatches_on_kind() {
        let templates = TemplateSet::from_raw(&TEST_TEMPLATES).unwrap();

        let post = item(ContentKind::Post, "/hello", "Hello", "<p>hi</p>");
        assert_eq!(
            templates.render_item(&post, "/").unwrap(),
            "<title>Hello</title>[header]<post><p>hi</p></post>"
        );

        let page = item(ContentKind::Page, "/about", "About", "<p>me</p>");
        assert_eq!(
            templates.render_item(&page, "/").unwrap(),
            "<title>About</title>[header]<page><p>me</p></page>"
        );
    }

    #[test]
    fn test_render_post_list() {
        let templates = TemplateSet::from_raw(&TEST_TEMPLATES).unwrap();
        let posts = vec![
            item(ContentKind::Post, "/a", "A", ""),
            item(ContentKind::Post, "/b", "B", ""),
        ];
        assert_eq!(
            templates.render_post_list("All Posts", &posts, "/").unwrap(),
            "<title>All Posts</title>[header]<list>/a=A;/b=B;</list>"
        );
    }

    #[test]
    fn test_content_is_not_escaped() {
        let templates = TemplateSet::from_raw(&TEST_TEMPLATES).unwrap();
        let post = item(ContentKind::Post, "/x", "X", "<script>var a = \"&\";</script>");
        let html = templates.render_item(&post, "/").unwrap();
        assert!(html.contains("<script>var a = \"&\";</script>"));
    }

    #[test]
    fn test_default_templates_render() {
        let templates = TemplateSet::from_raw(&DEFAULT_TEMPLATES).unwrap();
        let post = item(ContentKind::Post, "/hello-world", "Hello World", "<p>Hi</p>");
        let html = templates.render_item(&post, "/").unwrap();
        assert!(html.contains("<title>Hello World</title>"));
        assert!(html.contains("<nav>"));
        assert!(html.contains("<p>Hi</p>"));

        let list = templates
            .render_post_list("All Posts", &[post.clone()], "/")
            .unwrap();
        assert!(list.contains("<a href=\"/hello-world\">Hello World</a>"));

        let html = templates.render_item(&post, "/blog/").unwrap();
        assert!(html.contains("href=\"/blog/static/css/style.css\""));
        assert!(html.contains("<a href=\"/blog/posts\">"));
        let list = templates
            .render_post_list("All Posts", &[post], "/blog/")
            .unwrap();
        assert!(list.contains("<a href=\"/blog/hello-world\">Hello World</a>"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &TEST_TEMPLATES);
        let templates = TemplateSet::load(dir.path()).unwrap();
        let page = item(ContentKind::Page, "/", "Home", "welcome");
        assert_eq!(
            templates.render_item(&page, "/").unwrap(),
            "<title>Home</title>[header]<page>welcome</page>"
        );
    }

    #[test]
    fn test_load_missing_template_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &TEST_TEMPLATES[..4]);
        assert!(TemplateSet::load(dir.path()).is_err());
    }

    #[test]
    fn test_load_malformed_template_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &TEST_TEMPLATES);
        fs::write(dir.path().join("post.html"), "{% if %}").unwrap();
        assert!(TemplateSet::load(dir.path()).is_err());
    }
}
