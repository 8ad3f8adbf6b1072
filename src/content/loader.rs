//! Content loader - loads HTML fragments from a content directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{ContentItem, ContentKind};

/// Load every `.html` fragment directly inside `dir`.
///
/// Subdirectories are not descended into. A file that cannot be read is
/// logged and skipped; failing to list the directory is an error.
pub fn load_dir(dir: &Path, kind: ContentKind, untitled: &str) -> Result<Vec<ContentItem>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read content directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to read content directory {}", dir.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut items = Vec::new();

    for entry in entries {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };
        if is_dir || !file_name.ends_with(".html") {
            continue;
        }

        let path = entry.path();
        let content_html = match read_fragment(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read file {:?}: {:#}", path, e);
                continue;
            }
        };

        let slug = slug_from_file_name(file_name);
        let title = title_from_slug(&slug).unwrap_or_else(|| untitled.to_string());
        tracing::debug!("Loaded {} {} from {:?}", kind, slug, path);

        items.push(ContentItem {
            title,
            content_html,
            slug,
            kind,
        });
    }

    Ok(items)
}

fn read_fragment(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8(bytes)?)
}

/// `my-post.html` -> `/my-post`
pub fn slug_from_file_name(file_name: &str) -> String {
    format!("/{}", file_name.strip_suffix(".html").unwrap_or(file_name))
}

/// `/my-post` -> `My Post`. `None` when nothing is left to title.
pub fn title_from_slug(slug: &str) -> Option<String> {
    let words = slug.trim_start_matches('/').replace('-', " ");
    let title = capitalize_words(&words);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Uppercase the first letter of every word, leaving the rest untouched
fn capitalize_words(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = is_word_separator(c);
    }
    result
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || c == '_')
    } else {
        c.is_whitespace()
    }
}
