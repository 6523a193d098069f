//! Filesystem helpers shared by the staging and parity steps.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copy a file or directory without caring which the source is.
///
/// Directories are copied recursively; anything else goes through a plain
/// file copy. Fails if `src` does not exist or `dest`'s parent is not
/// writable.
pub fn copy_any(src: &Path, dest: &Path) -> Result<()> {
    if src.is_dir() {
        copy_tree(src, dest)
    } else {
        fs::copy(src, dest)
            .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;
        Ok(())
    }
}

/// Recursively copy a directory tree, preserving relative layout.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("walking {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("creating {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("copying {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

/// Append a suffix to a path's final component.
///
/// Unlike `Path::with_extension` this never replaces an existing extension,
/// so `photo.jpg` + `.zip` yields `photo.jpg.zip`.
pub fn append_ext(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
