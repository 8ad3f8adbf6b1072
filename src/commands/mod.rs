//! Command implementations

pub mod build;
pub mod clean;
pub mod list;
