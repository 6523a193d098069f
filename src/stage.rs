//! Per-input staging: copy one input into the staging directory, then derive
//! every configured archive and compressed variant from it.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::fsutil::{append_ext, copy_any};
use crate::process::Cmd;
use crate::tables::{ARCHIVERS, COMPRESSORS, EXTENSION_RENAMES};

/// Process one input path into the staging directory.
///
/// Copies the input alongside its future artifacts, produces one archive per
/// configured archiver (skipping archives that already exist, so a rerun
/// against the same staging directory is idempotent), compresses the copied
/// file and the `.tar` artifact with every configured compressor, and
/// finally normalizes the tar-plus-compressor compound extensions.
///
/// Any nonzero exit from an invoked tool aborts the run.
pub fn process_input(inpath: &Path, staging: &Path) -> Result<()> {
    let staging = fs::canonicalize(staging)
        .with_context(|| format!("resolving staging directory {}", staging.display()))?;
    let name = inpath
        .file_name()
        .with_context(|| format!("input path has no file name: {}", inpath.display()))?;
    let dest = staging.join(name);

    log::info!("Processing {} -> {}", inpath.display(), staging.display());

    log::info!("Copying {} -> {}", inpath.display(), dest.display());
    copy_any(inpath, &dest)?;

    archive(&dest, name, &staging, ARCHIVERS)?;
    compress(&dest, name, &staging, COMPRESSORS)?;
    rename_compound_extensions(&dest, EXTENSION_RENAMES)?;

    Ok(())
}

/// Produce `<dest><ext>` for every archiver entry, in table order.
///
/// The archive path is absolute while the member is the bare input name, so
/// the archive records `name` rather than a full staging path.
fn archive(
    dest: &Path,
    name: &OsStr,
    staging: &Path,
    archivers: &[(&str, &[&str])],
) -> Result<()> {
    for (ext, argv) in archivers {
        let archive_path = append_ext(dest, ext);
        if archive_path.exists() {
            log::info!("Skipping. Already exists: {}", archive_path.display());
            continue;
        }

        log::info!("Archiving {} -> {}", name.to_string_lossy(), archive_path.display());
        Cmd::new(argv[0])
            .args(&argv[1..])
            .arg_path(&archive_path)
            .arg(name)
            .current_dir(staging)
            .error_msg(format!("{} failed for {}", argv[0], archive_path.display()))
            .run_interactive()?;
    }
    Ok(())
}

/// Compress the staged copy (if it is a plain file) and the `.tar` artifact
/// with every compressor entry, in table order.
///
/// Each pass leaves its input in place (keep-original flag), so one `.tar`
/// feeds all compressors.
fn compress(
    dest: &Path,
    name: &OsStr,
    staging: &Path,
    compressors: &[(&str, &[&str])],
) -> Result<()> {
    let mut tar_name = name.to_os_string();
    tar_name.push(".tar");

    for (_ext, argv) in compressors {
        if dest.is_file() {
            log::info!("Compressing {} with {}", dest.display(), argv[0]);
            Cmd::new(argv[0])
                .args(&argv[1..])
                .arg_path(dest)
                .current_dir(staging)
                .error_msg(format!("{} failed for {}", argv[0], dest.display()))
                .run_interactive()?;
        }

        log::info!("Compressing {} with {}", tar_name.to_string_lossy(), argv[0]);
        Cmd::new(argv[0])
            .args(&argv[1..])
            .arg(&tar_name)
            .current_dir(staging)
            .error_msg(format!(
                "{} failed for {}",
                argv[0],
                tar_name.to_string_lossy()
            ))
            .run_interactive()?;
    }
    Ok(())
}

/// Rename `<dest><compound>` to `<dest><canonical>` where the compound
/// artifact exists.
fn rename_compound_extensions(dest: &Path, renames: &[(&str, &str)]) -> Result<()> {
    for (from, to) in renames {
        let src = append_ext(dest, from);
        if !src.exists() {
            continue;
        }
        let target = append_ext(dest, to);
        fs::rename(&src, &target).with_context(|| {
            format!("renaming {} to {}", src.display(), target.display())
        })?;
    }
    Ok(())
}
