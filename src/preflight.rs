//! Preflight checks for the external tools a run will invoke.
//!
//! Every format in the command tables is always applied, so a missing
//! archiver would otherwise surface as a cryptic spawn failure halfway
//! through staging. Checking up front turns that into one readable report.

use anyhow::{bail, Result};

/// Tools required by every run, with the package that usually provides them.
pub const REQUIRED_TOOLS: &[(&str, &str)] = &[
    ("zip", "zip"),
    ("tar", "tar"),
    ("7z", "p7zip-full"),
    ("rar", "rar"),
    ("jlha", "jlha-utils"),
    ("arj", "arj"),
    ("zoo", "zoo"),
    ("gzip", "gzip"),
    ("bzip2", "bzip2"),
    ("lzip", "lzip"),
    ("lzma", "xz-utils"),
    ("xz", "xz-utils"),
    ("genisoimage", "genisoimage"),
    ("dvdisaster", "dvdisaster"),
];

/// Parity tooling, skipped when `.par2` generation is disabled.
pub const PAR2_TOOLS: &[(&str, &str)] = &[("par2", "par2cmdline")];

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Check that specific tools are available.
///
/// Reports every missing tool at once rather than failing on the first.
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let mut missing = Vec::new();

    for (tool, package) in tools {
        if !command_exists(tool) {
            missing.push((*tool, *package));
        }
    }

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("  {} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Missing required host tools:\n{}", msg);
    }

    Ok(())
}

/// Check every tool a run with the given options will invoke.
pub fn check_host_tools(no_par2: bool) -> Result<()> {
    check_required_tools(REQUIRED_TOOLS)?;
    if !no_par2 {
        check_required_tools(PAR2_TOOLS)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ARCHIVERS, COMPRESSORS, DVDISASTER_TOOL, GENISOIMAGE_TOOL, PAR2_TOOL};

    #[test]
    fn test_command_exists() {
        assert!(command_exists("ls"));
        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }

    #[test]
    fn test_check_required_tools_success() {
        let tools = &[("ls", "coreutils"), ("cat", "coreutils")];
        assert!(check_required_tools(tools).is_ok());
    }

    #[test]
    fn test_check_required_tools_reports_all_missing() {
        let tools = &[
            ("nonexistent_command_xyz", "fake-package"),
            ("other_missing_command_xyz", "other-package"),
        ];
        let err = check_required_tools(tools).unwrap_err().to_string();
        assert!(err.contains("nonexistent_command_xyz"));
        assert!(err.contains("other_missing_command_xyz"));
    }

    #[test]
    fn test_required_tools_cover_the_command_tables() {
        let covered: Vec<&str> = REQUIRED_TOOLS.iter().map(|(t, _)| *t).collect();
        for (_, argv) in ARCHIVERS.iter().chain(COMPRESSORS.iter()) {
            assert!(
                covered.contains(&argv[0]),
                "{} missing from REQUIRED_TOOLS",
                argv[0]
            );
        }
        assert!(covered.contains(&GENISOIMAGE_TOOL));
        assert!(covered.contains(&DVDISASTER_TOOL));
        assert!(PAR2_TOOLS.iter().any(|(t, _)| *t == PAR2_TOOL));
    }
}
