//! Builds a redundancy-maximized ISO from files/folders for long-term
//! archival on write-once media.
//!
//! The aim is to not waste a byte of a disc that can never be rewritten:
//! every input is stored raw, archived in several formats, compressed with
//! several compressors, covered by `.par2` recovery files, and the final
//! image carries both ISO9660+Joliet and UDF structures plus sector-level
//! RS02 padding.
//!
//! All real work is delegated to external tools:
//!
//! - `genisoimage` creates the ISO so filesystem-level redundancy (ISO9660
//!   plus UDF table-of-contents) can be enabled in one place.
//! - `dvdisaster` augments the ISO with ECC padding that also protects the
//!   filesystem structures and the low-level bitstream.
//! - `par2` adds a recovery layer within the filesystem for each artifact.
//! - A table of archivers (`zip`, `tar`, `7z`, ...) and compressors
//!   (`gzip`, `bzip2`, ...) multiplies the stored copies of each input.
//!
//! This crate is a sequencing layer over those subprocesses; it implements
//! no compression, parity, or filesystem format itself.

pub mod app;
pub mod fsutil;
pub mod iso;
pub mod parity;
pub mod preflight;
pub mod process;
pub mod stage;
pub mod tables;

pub use process::Cmd;
