//! Codec Module
//!
//! Persistence formats for a dictionary.
//!
//! ## Binary Format (big-endian, W = id width in bytes)
//! ```text
//! ┌───────────┬──────────────┬───────────────────────────────────┐
//! │ CRC32 (4) │ last_id (W)  │ Record*                           │
//! └───────────┴──────────────┴───────────────────────────────────┘
//!
//! Record:
//! ┌──────────┬─────────────────────┬───────────┐
//! │ Id (W)   │ Key (1..=128 bytes) │ 0x1E (1)  │
//! └──────────┴─────────────────────┴───────────┘
//! ```
//! The CRC covers everything after itself. Keys are delimited rather than
//! length-prefixed, which is why keys may never contain 0x1E. The width is
//! not recorded; readers must know it.
//!
//! ## Text Format
//! ```text
//! # comment
//! 1;first key
//! 2;second key
//! ```

pub mod binary;
pub mod text;

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::id::Id;

pub use binary::{decode, encode, encoded_len_bound, max_blob_size};

/// Size of the leading checksum in the binary format
pub const CHECKSUM_SIZE: usize = 4;

/// Terminates every key in the binary format (ASCII "record separator")
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// Decoded dictionary contents, independent of format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Records<W: Id> {
    /// Stored high-water mark (0 when the format does not carry one)
    pub last_id: W,

    /// (id, key) pairs in file order
    pub entries: Vec<(W, String)>,
}

impl<W: Id> Records<W> {
    pub fn new() -> Self {
        Self {
            last_id: W::ZERO,
            entries: Vec::new(),
        }
    }
}

impl<W: Id> Default for Records<W> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// File helpers
// =============================================================================

/// Read a whole file, optionally creating it empty when missing
pub(crate) fn read_file(path: &Path, create_if_missing: bool) -> Result<Vec<u8>> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(create_if_missing)
        .create(create_if_missing)
        .open(path)?;

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;
    Ok(raw)
}

/// Replace `path` with `contents` via a sibling temp file and a rename, so
/// readers never observe a half-written file
pub(crate) fn write_file(path: &Path, contents: &[u8], sync: bool) -> Result<()> {
    let tmp = tmp_path(path);

    {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        file.write_all(contents)?;
        if sync {
            file.sync_all()?;
        }
    }

    fs::rename(&tmp, path)?;

    if sync {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // Directory fsync is unsupported on some platforms
            if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
                debug!(dir = %dir.display(), error = %e, "directory fsync skipped");
            }
        }
    }

    Ok(())
}

/// "dict.dat" → "dict.dat.tmp"
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
