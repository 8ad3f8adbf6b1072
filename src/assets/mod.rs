//! Static asset copier - mirrors a source tree into the output directory

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively copy `src_dir` into `dest_dir`, preserving permission bits.
///
/// Regular files are copied byte for byte and directories are recreated.
/// Any other entry (symlink, socket, device) aborts the copy. Failing to
/// apply permissions is only a warning.
pub fn copy_all(src_dir: &Path, dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir).with_context(|| {
        format!(
            "failed to create destination static directory {}",
            dest_dir.display()
        )
    })?;

    // Directory modes are applied once their contents are in place
    let mut dir_permissions: Vec<(PathBuf, fs::Permissions)> = Vec::new();

    for entry in WalkDir::new(src_dir).follow_links(false) {
        let entry = entry.with_context(|| format!("failed to walk {}", src_dir.display()))?;
        let src_path = entry.path();
        let relative = src_path
            .strip_prefix(src_dir)
            .with_context(|| format!("failed to get relative path for {}", src_path.display()))?;
        let dest_path = dest_dir.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            let metadata = entry
                .metadata()
                .with_context(|| format!("failed to get info for directory {}", src_path.display()))?;
            create_dir(&dest_path)?;
            dir_permissions.push((dest_path, metadata.permissions()));
        } else if file_type.is_file() {
            copy_file(src_path, &dest_path).with_context(|| {
                format!(
                    "failed to copy file from {} to {}",
                    src_path.display(),
                    dest_path.display()
                )
            })?;
        } else {
            return Err(anyhow!("{} is not a regular file", src_path.display()));
        }
    }

    for (path, permissions) in dir_permissions.into_iter().rev() {
        if let Err(e) = fs::set_permissions(&path, permissions) {
            tracing::warn!("Failed to set permissions on {:?}: {}", path, e);
        }
    }

    Ok(())
}

/// Create a destination directory, reopening it for writes if a previous
/// copy left it read-only
fn create_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        make_writable(path);
        return Ok(());
    }
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory {}", path.display()))
}

/// Copy a single regular file, preserving permissions
fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(src)?;
    if !metadata.is_file() {
        return Err(anyhow!("{} is not a regular file", src.display()));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create directory for destination file {}",
                dest.display()
            )
        })?;
    }
    if dest.exists() {
        make_writable(dest);
    }

    fs::copy(src, dest)?;

    if let Err(e) = fs::set_permissions(dest, metadata.permissions()) {
        tracing::warn!("Failed to set permissions on {:?}: {}", dest, e);
    }
    tracing::debug!("Copied static asset {:?} -> {:?}", src, dest);
    Ok(())
}

#[cfg(unix)]
fn make_writable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o200 == 0 {
            let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o200));
        }
    }
}

#[cfg(not(unix))]
fn make_writable(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            let _ = fs::set_permissions(path, permissions);
        }
    }
}
