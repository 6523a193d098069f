//! Command-line schema and the top-level driver.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use crate::tables::{MAX_VOLID_LEN, STAGING_PREFIX};
use crate::{iso, parity, preflight, stage};

/// The verbosity level when no `-q` or `-v` arguments are given, with `0`
/// being `-q`.
pub const DEFAULT_VERBOSITY: i8 = 1;

/// Command-line argument schema
#[derive(Parser, Debug)]
#[command(
    version,
    rename_all = "kebab-case",
    about = "Builds a redundancy-maximized ISO from files/folders for archival \
             on write-once media.\n\nDelegates all real work to genisoimage, \
             dvdisaster, par2, and a table of archivers and compressors."
)]
pub struct CliOpts {
    /// Decrease the verbosity. Use twice for extra effect.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Increase the verbosity. Use twice for extra effect.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Display timestamps on log messages (sec, ms, us, ns, none)
    #[arg(short, long, value_name = "resolution", value_parser = parse_timestamp)]
    pub timestamp: Option<stderrlog::Timestamp>,

    /// Files/folders to copy into the root of the ECC-protected ISO and
    /// protect.
    #[arg(required = true, value_name = "INPATH")]
    pub inpath: Vec<PathBuf>,

    /// Volume ID for the generated ISO. (Default: the first 32 characters of
    /// the first file's name)
    #[arg(long, value_name = "STRING")]
    pub volid: Option<String>,

    /// Name of the ISO to generate.
    #[arg(short, long, value_name = "PATH", default_value = "./output.iso")]
    pub outpath: PathBuf,

    /// Don't generate .par2 files.
    #[arg(long)]
    pub no_par2: bool,
}

impl CliOpts {
    /// Net verbosity from the `-v`/`-q` counters; negative means silence.
    pub fn verbosity(&self) -> i8 {
        DEFAULT_VERBOSITY
            .saturating_add(self.verbose.min(i8::MAX as u8) as i8)
            .saturating_sub(self.quiet.min(i8::MAX as u8) as i8)
    }
}

fn parse_timestamp(value: &str) -> Result<stderrlog::Timestamp, String> {
    match value {
        "sec" => Ok(stderrlog::Timestamp::Second),
        "ms" => Ok(stderrlog::Timestamp::Millisecond),
        "us" => Ok(stderrlog::Timestamp::Microsecond),
        "ns" => Ok(stderrlog::Timestamp::Nanosecond),
        "none" | "off" => Ok(stderrlog::Timestamp::Off),
        other => Err(format!(
            "invalid timestamp resolution '{}' (expected sec, ms, us, ns, or none)",
            other
        )),
    }
}

/// Resolve the volume identifier, truncated to what ISO9660 allows.
pub fn resolve_volume_id(volid: Option<&str>, inputs: &[PathBuf]) -> String {
    let raw = match volid {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => inputs
            .first()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    raw.chars().take(MAX_VOLID_LEN).collect()
}

/// Run the whole pipeline: stage every input, generate parity, build the
/// ISO, augment it with ECC data.
///
/// The staging directory is created next to the output path and removed on
/// every exit path, including early fatal errors, by the `TempDir` guard.
pub fn run(opts: &CliOpts) -> Result<()> {
    preflight::check_host_tools(opts.no_par2)?;

    let abs_outpath = if opts.outpath.is_absolute() {
        opts.outpath.clone()
    } else {
        std::env::current_dir()
            .context("resolving current directory")?
            .join(&opts.outpath)
    };
    let out_parent = abs_outpath
        .parent()
        .with_context(|| format!("output path has no parent: {}", abs_outpath.display()))?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(out_parent)
        .with_context(|| format!("creating staging directory in {}", out_parent.display()))?;

    for inpath in &opts.inpath {
        if !inpath.exists() {
            log::warn!("Input path does not exist: {}", inpath.display());
            continue;
        }
        stage::process_input(inpath, staging.path())?;
    }

    if opts.no_par2 {
        log::debug!("par2 generation disabled");
    } else {
        generate_parity(staging.path())?;
    }

    let volume_id = resolve_volume_id(opts.volid.as_deref(), &opts.inpath);
    iso::generate_iso(staging.path(), &opts.outpath, &volume_id)?;

    staging.close().context("removing staging directory")?;
    Ok(())
}

/// Apply par2 to every staged artifact, sorted by name.
fn generate_parity(staging: &Path) -> Result<()> {
    let mut artifacts = Vec::new();
    for entry in
        fs::read_dir(staging).with_context(|| format!("listing {}", staging.display()))?
    {
        let entry = entry.with_context(|| format!("listing {}", staging.display()))?;
        artifacts.push(entry.path());
    }
    artifacts.sort();

    for path in artifacts {
        if path.extension().is_some_and(|ext| ext == "par2") {
            log::debug!("Not generating .par2.par2: {}", path.display());
            continue;
        }
        log::info!("Applying par2 to {}", path.display());
        parity::parchive(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outpath_has_expected_default_if_not_given() {
        let opts = CliOpts::try_parse_from(["disc-balloon", "photo.jpg"]).unwrap();
        assert_eq!(opts.outpath, PathBuf::from("./output.iso"));
    }

    #[test]
    fn test_at_least_one_inpath_is_required() {
        assert!(CliOpts::try_parse_from(["disc-balloon"]).is_err());
    }

    #[test]
    fn test_flags_parse() {
        let opts = CliOpts::try_parse_from([
            "disc-balloon",
            "-vv",
            "-q",
            "--no-par2",
            "--volid",
            "GAMEDISC",
            "-o",
            "out/final.iso",
            "a",
            "b",
        ])
        .unwrap();
        assert_eq!(opts.verbose, 2);
        assert_eq!(opts.quiet, 1);
        assert!(opts.no_par2);
        assert_eq!(opts.volid.as_deref(), Some("GAMEDISC"));
        assert_eq!(opts.outpath, PathBuf::from("out/final.iso"));
        assert_eq!(opts.inpath, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_verbosity_counters() {
        let opts = CliOpts::try_parse_from(["disc-balloon", "photo.jpg"]).unwrap();
        assert_eq!(opts.verbosity(), DEFAULT_VERBOSITY);

        let opts = CliOpts::try_parse_from(["disc-balloon", "-vv", "photo.jpg"]).unwrap();
        assert_eq!(opts.verbosity(), DEFAULT_VERBOSITY + 2);

        let opts = CliOpts::try_parse_from(["disc-balloon", "-qq", "photo.jpg"]).unwrap();
        assert!(opts.verbosity() < 0);
    }

    #[test]
    fn test_timestamp_resolutions() {
        let opts =
            CliOpts::try_parse_from(["disc-balloon", "-t", "ms", "photo.jpg"]).unwrap();
        assert!(matches!(
            opts.timestamp,
            Some(stderrlog::Timestamp::Millisecond)
        ));
        assert!(CliOpts::try_parse_from(["disc-balloon", "-t", "fortnight", "photo.jpg"])
            .is_err());
    }

    #[test]
    fn test_volume_id_defaults_to_first_input_name() {
        let inputs = vec![PathBuf::from("dir/photo.jpg")];
        assert_eq!(resolve_volume_id(None, &inputs), "photo.jpg");
    }

    #[test]
    fn test_volume_id_is_truncated_to_32_chars() {
        let inputs = vec![PathBuf::from(
            "an_extremely_long_volume_name_that_keeps_going.img",
        )];
        let volid = resolve_volume_id(None, &inputs);
        assert_eq!(volid.chars().count(), 32);
        assert_eq!(volid, "an_extremely_long_volume_name_th");

        let explicit = "x".repeat(40);
        assert_eq!(
            resolve_volume_id(Some(&explicit), &inputs).chars().count(),
            32
        );
    }

    #[test]
    fn test_empty_volid_falls_back_to_derivation() {
        let inputs = vec![PathBuf::from("photo.jpg")];
        assert_eq!(resolve_volume_id(Some(""), &inputs), "photo.jpg");
    }
}
