//! Configuration module

mod project;

pub use project::ProjectConfig;
