//! Parity-file generation via `par2`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::fsutil::append_ext;
use crate::process::Cmd;
use crate::tables::{PAR2_ARGS, PAR2_TOOL};

/// Generate a `.par2` recovery file for the source path, placed in the same
/// parent directory.
///
/// For a directory the whole tree is protected by a single invocation over
/// every file beneath it; for a file only that file is covered. Either way
/// `par2` runs with the parent directory as its working directory so the
/// recovery set records relative paths.
pub fn parchive(src_path: &Path) -> Result<()> {
    let parent = src_path
        .parent()
        .with_context(|| format!("path has no parent directory: {}", src_path.display()))?;
    let name = src_path
        .file_name()
        .with_context(|| format!("path has no file name: {}", src_path.display()))?;
    let par2_path = append_ext(src_path, ".par2");

    if src_path.is_dir() {
        let members = protected_members(src_path, parent)?;
        Cmd::new(PAR2_TOOL)
            .args(PAR2_ARGS)
            .arg_path(&par2_path)
            .args(&members)
            .current_dir(parent)
            .error_msg(format!("par2 failed for {}", src_path.display()))
            .run_interactive()
    } else {
        Cmd::new(PAR2_TOOL)
            .args(PAR2_ARGS)
            .arg_path(&par2_path)
            .arg(name)
            .current_dir(parent)
            .error_msg(format!("par2 failed for {}", src_path.display()))
            .run_interactive()
    }
}

/// Enumerate every file beneath `dir`, relative to `base`.
fn protected_members(dir: &Path, base: &Path) -> Result<Vec<PathBuf>> {
    let mut members = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(base)
            .expect("walkdir yields paths under the parent");
        members.push(rel.to_path_buf());
    }
    Ok(members)
}
