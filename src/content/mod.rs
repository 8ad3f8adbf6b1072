//! Content module - HTML fragments loaded as posts and pages

mod item;
pub mod loader;

pub use item::{output_file_for_slug, ContentItem, ContentKind};
pub use loader::{load_dir, slug_from_file_name, title_from_slug};
