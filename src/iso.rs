//! ISO generation and ECC augmentation.
//!
//! `genisoimage` assembles the staged artifacts into an ISO9660+Joliet+UDF
//! image via graft points, then `dvdisaster` pads the image in place with
//! RS02 error-correction data.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::process::Cmd;
use crate::tables::{
    DVDISASTER_MEDIUM, DVDISASTER_METHOD, DVDISASTER_TOOL, GENISOIMAGE_OPTS, GENISOIMAGE_TOOL,
};

/// Escape a path for use in a `-graft-points` specification.
///
/// Must be applied before the significant `=` separator is appended.
pub fn escape_graft(path: &str) -> String {
    path.replace('\\', "\\\\").replace('=', "\\=")
}

/// Build `name=path` graft specifications from (name, path) pairs.
///
/// Two entries escaping to the same name would silently shadow each other
/// inside the image, so a collision is fatal.
fn graft_points<'a, I>(entries: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen = HashSet::new();
    let mut grafts = Vec::new();

    for (name, path) in entries {
        let name = escape_graft(name);
        let path = escape_graft(path);

        if !seen.insert(name.clone()) {
            bail!("Naming collision: {}", name);
        }
        grafts.push(format!("{}={}", name, path));
    }

    Ok(grafts)
}

/// Generate a dvdisaster-augmented ISO from the given folder.
///
/// Every immediate entry of `src_dir` becomes a direct child of the image
/// root via a graft point.
pub fn generate_iso(src_dir: &Path, outpath: &Path, volume_id: &str) -> Result<()> {
    let src_dir = fs::canonicalize(src_dir)
        .with_context(|| format!("resolving source directory {}", src_dir.display()))?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(&src_dir)
        .with_context(|| format!("listing {}", src_dir.display()))?
    {
        let entry = entry.with_context(|| format!("listing {}", src_dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = src_dir.join(entry.file_name()).to_string_lossy().into_owned();
        entries.push((name, path));
    }
    entries.sort();

    let grafts = graft_points(entries.iter().map(|(n, p)| (n.as_str(), p.as_str())))?;

    log::info!(
        "Generating {} from {} entries in {}",
        outpath.display(),
        grafts.len(),
        src_dir.display()
    );
    Cmd::new(GENISOIMAGE_TOOL)
        .args(GENISOIMAGE_OPTS)
        .args(["-volid", volume_id])
        .arg("-o")
        .arg_path(outpath)
        .arg("-graft-points")
        .args(&grafts)
        .error_msg(format!("genisoimage failed for {}", outpath.display()))
        .run_interactive()?;

    let cores = available_cores();
    log::info!("Augmenting {} with {} ECC data", outpath.display(), DVDISASTER_METHOD);
    Cmd::new(DVDISASTER_TOOL)
        .arg("-c")
        .arg("-x")
        .arg(cores.to_string())
        .arg(format!("-m{}", DVDISASTER_METHOD))
        .args(["-n", DVDISASTER_MEDIUM])
        .arg("-i")
        .arg_path(outpath)
        .error_msg(format!("dvdisaster failed for {}", outpath.display()))
        .run_interactive()?;

    Ok(())
}

/// Processing units available for dvdisaster's internal parallelism.
fn available_cores() -> usize {
    match std::thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(e) => {
            log::warn!("Could not detect CPU count ({}), using 1", e);
            1
        }
    }
}
