//! Static command tables for the external tools the pipeline drives.
//!
//! Each table entry pairs the produced file extension with the command that
//! produces it. Table order is priority order; every entry is always applied.

/// Application identifier embedded in the generated ISO header.
pub const APP_ID: &str = "disc-balloon";

/// Prefix for the per-run staging directory.
pub const STAGING_PREFIX: &str = "disc-balloon-";

/// Maximum length of an ISO9660 volume identifier.
pub const MAX_VOLID_LEN: usize = 32;

/// Archivers, each invoked as `<cmd...> <archive_path> <member_name>`.
pub const ARCHIVERS: &[(&str, &[&str])] = &[
    (".zip", &["zip", "-rT"]),
    (".tar", &["tar", "cf"]),
    (".7z", &["7z", "a", "-y"]),
    (".rar", &["rar", "a", "-r", "-rr", "-t", "-y"]),
    (".lzh", &["jlha", "a"]),
    (".arj", &["arj", "a", "-r", "-hk", "-y"]),
    (".zoo", &["zoo", "ah"]),
];

/// Compressors, each invoked as `<cmd...> <file>`.
///
/// The keep-original flag is mandatory; the uncompressed artifact must
/// survive so later table entries can compress it too.
pub const COMPRESSORS: &[(&str, &[&str])] = &[
    (".gz", &["gzip", "-k"]),
    (".bz2", &["bzip2", "-k"]),
    (".lz", &["lzip", "-k"]),
    (".lzma", &["lzma", "-k"]),
    (".xz", &["xz", "-k"]),
];

/// Canonical short forms for tar-plus-compressor compound extensions.
pub const EXTENSION_RENAMES: &[(&str, &str)] = &[
    (".tar.bz2", ".tbz2"),
    (".tar.gz", ".tgz"),
    (".tar.lz", ".tlz"),
    (".tar.xz", ".txz"),
];

pub const PAR2_TOOL: &str = "par2";

/// `par2 c`: one recovery file, 20% redundancy.
pub const PAR2_ARGS: &[&str] = &["c", "-n1", "-r20"];

pub const GENISOIMAGE_TOOL: &str = "genisoimage";

/// Fixed option set for ISO generation.
///
/// The goal is maximum on-disc redundancy of naming metadata: ISO9660 level 1
/// for DOS, Joliet for Win9x, Rock Ridge as the authoritative names, a UDF
/// bridge table, and TRANS.TBL files for DOS-visible long names.
pub const GENISOIMAGE_OPTS: &[&str] = &[
    "-appid",
    APP_ID,
    "-sysid",
    "LINUX",
    "-quiet",
    "-no-cache-inodes",
    "-udf",
    "-iso-level",
    "1",
    "-joliet",
    "-rational-rock",
    "-translation-table",
    "-hide-joliet-trans-tbl",
];

pub const DVDISASTER_TOOL: &str = "dvdisaster";

/// Error-correction method passed to dvdisaster's create mode.
pub const DVDISASTER_METHOD: &str = "RS02";

/// Medium type passed to dvdisaster's create mode.
pub const DVDISASTER_MEDIUM: &str = "CD";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_archiver_extensions_are_unique() {
        let mut seen = HashSet::new();
        for (ext, _) in ARCHIVERS {
            assert!(seen.insert(ext), "duplicate archiver extension {}", ext);
        }
    }

    #[test]
    fn test_compressor_extensions_are_unique() {
        let mut seen = HashSet::new();
        for (ext, _) in COMPRESSORS {
            assert!(seen.insert(ext), "duplicate compressor extension {}", ext);
        }
    }

    #[test]
    fn test_tables_are_well_formed() {
        for (ext, argv) in ARCHIVERS.iter().chain(COMPRESSORS.iter()) {
            assert!(ext.starts_with('.'));
            assert!(!argv.is_empty());
        }
        for (from, to) in EXTENSION_RENAMES {
            assert!(from.starts_with(".tar."));
            assert!(to.starts_with('.'));
        }
    }

    #[test]
    fn test_renames_cover_tar_compound_extensions() {
        // Every rename source must be ".tar" plus a configured compressor
        // extension, or the rename pass would never find its input.
        for (from, _) in EXTENSION_RENAMES {
            let compressor_ext = &from[".tar".len()..];
            assert!(
                COMPRESSORS.iter().any(|(ext, _)| ext == &compressor_ext),
                "rename source {} does not match any compressor",
                from
            );
        }
    }
}
