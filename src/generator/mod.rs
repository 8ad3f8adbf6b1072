//! Generator module - renders a site's content into its output directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::assets;
use crate::config::ProjectConfig;
use crate::content::{self, ContentItem, ContentKind};
use crate::site::Site;
use crate::templates::TemplateSet;
use crate::Blog;

/// Output file of the aggregate post list
pub const POST_LIST_FILE: &str = "posts.html";

/// Counts reported after a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub posts: usize,
    pub pages: usize,
    /// Files written, the post list included
    pub written: usize,
    /// Files that failed to render or write
    pub failed: usize,
}

/// Static site generator
pub struct Generator {
    config: ProjectConfig,
    templates: TemplateSet,
    /// Sites are served under `/<site>/` rather than at the root
    multi_site: bool,
}

impl Generator {
    /// Create a generator, parsing the project's template set
    pub fn new(blog: &Blog) -> Result<Self> {
        let templates = TemplateSet::load(&blog.templates_dir)?;
        Ok(Self::with_templates(blog.config.clone(), templates))
    }

    pub fn with_templates(config: ProjectConfig, templates: TemplateSet) -> Self {
        Self {
            config,
            templates,
            multi_site: false,
        }
    }

    /// Render links for serving every site under its own path prefix
    pub fn multi_site(mut self, multi_site: bool) -> Self {
        self.multi_site = multi_site;
        self
    }

    /// URL prefix a site's pages link against, always ending in `/`
    pub fn url_root(&self, site: &Site) -> String {
        let root = match self.config.root.trim_matches('/') {
            "" => "/".to_string(),
            root => format!("/{}/", root),
        };
        if self.multi_site {
            format!("{}{}/", root, site.name)
        } else {
            root
        }
    }

    /// Build one site into its output directory
    pub fn generate(&self, site: &Site) -> Result<BuildSummary> {
        tracing::info!("Starting site build for: {}", site.name);

        fs::create_dir_all(&site.output_dir).with_context(|| {
            format!(
                "failed to create output directory {} for site {}",
                site.output_dir.display(),
                site.name
            )
        })?;

        self.copy_static(site)?;

        let posts = self.load(site, &site.posts_dir(), ContentKind::Post)?;
        let pages = self.load(site, &site.pages_dir(), ContentKind::Page)?;

        let mut summary = BuildSummary {
            posts: posts.len(),
            pages: pages.len(),
            ..Default::default()
        };

        let root = self.url_root(site);
        if posts.is_empty() && pages.is_empty() {
            tracing::info!("No content found for site {}", site.name);
        }

        for item in posts.iter().chain(pages.iter()) {
            let path = site.output_dir.join(item.output_file());
            match self.templates.render_item(item, &root) {
                Ok(html) => self.write(&path, &html, site, &mut summary),
                Err(e) => {
                    tracing::warn!(
                        "Failed to execute template for {:?} (site {}): {:#}",
                        path,
                        site.name,
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        if !posts.is_empty() {
            let path = site.output_dir.join(POST_LIST_FILE);
            match self
                .templates
                .render_post_list(&self.config.post_list_title, &posts, &root)
            {
                Ok(html) => self.write(&path, &html, site, &mut summary),
                Err(e) => {
                    tracing::warn!(
                        "Failed to execute template for {:?} (site {}): {:#}",
                        path,
                        site.name,
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            "Site build finished for {}: {} posts, {} pages, {} files written, {} failed",
            site.name,
            summary.posts,
            summary.pages,
            summary.written,
            summary.failed
        );
        Ok(summary)
    }

    fn copy_static(&self, site: &Site) -> Result<()> {
        let static_dir = site.static_dir();
        if !path_exists(&static_dir)? {
            tracing::info!(
                "Source static directory {:?} for site {} not found, skipping static asset copy",
                static_dir,
                site.name
            );
            return Ok(());
        }

        let dest = site.static_output_dir();
        tracing::info!("Copying static assets for site {} to {:?}", site.name, dest);
        assets::copy_all(&static_dir, &dest)
            .with_context(|| format!("failed to copy static assets for site {}", site.name))
    }

    fn load(&self, site: &Site, dir: &Path, kind: ContentKind) -> Result<Vec<ContentItem>> {
        if !path_exists(dir)? {
            tracing::info!("{} directory not found for site {}, skipping: {:?}", kind, site.name, dir);
            return Ok(Vec::new());
        }

        let untitled = match kind {
            ContentKind::Post => &self.config.untitled_post,
            _ => &self.config.untitled_page,
        };
        content::load_dir(dir, kind, untitled).with_context(|| {
            format!(
                "failed to load {}s for site {} from {}",
                kind,
                site.name,
                dir.display()
            )
        })
    }

    fn write(&self, path: &Path, html: &str, site: &Site, summary: &mut BuildSummary) {
        let result = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(path, html));

        match result {
            Ok(()) => {
                tracing::debug!("Generated {:?} for site {}", path, site.name);
                summary.written += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to write {:?} for site {}: {}", path, site.name, e);
                summary.failed += 1;
            }
        }
    }
}

/// Whether `path` exists. Errors other than "not found" (permissions, a
/// file where a directory is expected) are returned.
pub(crate) fn path_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("failed to access {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::tests::TEST_TEMPLATES;
    use tempfile::TempDir;

    fn generator() -> Generator {
        let templates = TemplateSet::from_raw(&TEST_TEMPLATES).unwrap();
        Generator::with_templates(ProjectConfig::default(), templates)
    }

    fn site(dir: &TempDir) -> Site {
        Site::new("blog", &dir.path().join("sites"), &dir.path().join("public")).unwrap()
    }

    #[test]
    fn test_generate_site() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(site.posts_dir()).unwrap();
        fs::create_dir_all(site.pages_dir()).unwrap();
        fs::create_dir_all(site.static_dir().join("css")).unwrap();
        fs::write(site.posts_dir().join("first-post.html"), "<p>one</p>").unwrap();
        fs::write(site.posts_dir().join("second-post.html"), "<p>two</p>").unwrap();
        fs::write(site.pages_dir().join("about.html"), "<p>me</p>").unwrap();
        fs::write(site.static_dir().join("css/style.css"), "body {}").unwrap();

        let summary = generator().generate(&site).unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                posts: 2,
                pages: 1,
                written: 4,
                failed: 0
            }
        );

        let out = &site.output_dir;
        assert_eq!(
            fs::read_to_string(out.join("first-post.html")).unwrap(),
            "<title>First Post</title>[header]<post><p>one</p></post>"
        );
        assert_eq!(
            fs::read_to_string(out.join("about.html")).unwrap(),
            "<title>About</title>[header]<page><p>me</p></page>"
        );
        assert_eq!(
            fs::read_to_string(out.join(POST_LIST_FILE)).unwrap(),
            "<title>All Posts</title>[header]<list>/first-post=First Post;/second-post=Second Post;</list>"
        );
        assert_eq!(
            fs::read_to_string(out.join("static/css/style.css")).unwrap(),
            "body {}"
        );
    }

    #[test]
    fn test_generate_without_posts_skips_post_list() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(site.pages_dir()).unwrap();
        fs::create_dir_all(site.posts_dir()).unwrap();
        fs::write(site.pages_dir().join("about.html"), "about").unwrap();

        let summary = generator().generate(&site).unwrap();
        assert_eq!(summary.posts, 0);
        assert_eq!(summary.written, 1);
        assert!(site.output_dir.join("about.html").exists());
        assert!(!site.output_dir.join(POST_LIST_FILE).exists());
        assert!(!site.static_output_dir().exists());
    }

    #[test]
    fn test_generate_empty_site() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(&site.source_dir).unwrap();

        let summary = generator().generate(&site).unwrap();
        assert_eq!(summary, BuildSummary::default());
        assert!(site.output_dir.is_dir());
    }

    #[test]
    fn test_root_slug_page_becomes_index() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(site.pages_dir()).unwrap();
        fs::write(site.pages_dir().join(".html"), "home").unwrap();

        generator().generate(&site).unwrap();
        assert_eq!(
            fs::read_to_string(site.output_dir.join("index.html")).unwrap(),
            "<title>Untitled Page</title>[header]<page>home</page>"
        );
    }

    #[test]
    fn test_page_overwrites_post_with_same_slug() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(site.posts_dir()).unwrap();
        fs::create_dir_all(site.pages_dir()).unwrap();
        fs::write(site.posts_dir().join("same.html"), "post").unwrap();
        fs::write(site.pages_dir().join("same.html"), "page").unwrap();

        generator().generate(&site).unwrap();
        assert_eq!(
            fs::read_to_string(site.output_dir.join("same.html")).unwrap(),
            "<title>Same</title>[header]<page>page</page>"
        );
    }

    #[test]
    fn test_render_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(site.posts_dir()).unwrap();
        fs::create_dir_all(site.pages_dir()).unwrap();
        fs::write(site.posts_dir().join("post.html"), "post").unwrap();
        fs::write(site.pages_dir().join("page.html"), "page").unwrap();

        let mut templates = TEST_TEMPLATES;
        templates[2] = ("post.html", "{{ missing_variable }}");
        let generator = Generator::with_templates(
            ProjectConfig::default(),
            TemplateSet::from_raw(&templates).unwrap(),
        );

        let summary = generator.generate(&site).unwrap();
        assert_eq!(summary.failed, 1);
        assert!(site.output_dir.join("page.html").exists());
        assert!(!site.output_dir.join("post.html").exists());
        assert!(site.output_dir.join(POST_LIST_FILE).exists());
    }

    #[test]
    fn test_unreadable_content_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(&site.source_dir).unwrap();
        fs::write(site.content_dir(), "not a directory").unwrap();

        let err = generator().generate(&site).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to access"));
    }

    #[test]
    fn test_static_dir_as_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(&site.source_dir).unwrap();
        fs::write(site.source_dir.join("file"), "").unwrap();
        let site = Site {
            source_dir: site.source_dir.join("file"),
            ..site
        };

        assert!(generator().generate(&site).is_err());
    }

    #[test]
    fn test_url_root() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        assert_eq!(generator().url_root(&site), "/");
        assert_eq!(generator().multi_site(true).url_root(&site), "/blog/");

        let config = ProjectConfig {
            root: "/docs".to_string(),
            ..ProjectConfig::default()
        };
        let templates = TemplateSet::from_raw(&TEST_TEMPLATES).unwrap();
        let generator = Generator::with_templates(config, templates).multi_site(true);
        assert_eq!(generator.url_root(&site), "/docs/blog/");
    }

    #[test]
    fn test_links_use_url_root() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        fs::create_dir_all(site.pages_dir()).unwrap();
        fs::write(site.pages_dir().join("about.html"), "about").unwrap();

        let mut templates = TEST_TEMPLATES;
        templates[0] = ("base.html", "<link href=\"{{ root }}static/css/style.css\">{{ body }}");
        let generator = Generator::with_templates(
            ProjectConfig::default(),
            TemplateSet::from_raw(&templates).unwrap(),
        )
        .multi_site(true);

        generator.generate(&site).unwrap();
        assert_eq!(
            fs::read_to_string(site.output_dir.join("about.html")).unwrap(),
            "<link href=\"/blog/static/css/style.css\"><page>about</page>"
        );
    }
}
