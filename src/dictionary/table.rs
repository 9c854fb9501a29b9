//! Dictionary implementation
//!
//! HashMap pair with a single RwLock for concurrency.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::codec::{self, binary, text};
use crate::error::{DictError, Result};
use crate::id::Id;

use super::{validate_key, Tables};

/// Bidirectional key ↔ id dictionary
///
/// ## Concurrency:
/// - Reads (`get_key`, `count`, `get_prefix`, `marshal`, ...) share the read lock
/// - Allocation, renames and loads take the write lock
/// - Loads decode outside the lock and swap the result in, so a failed load
///   leaves the dictionary untouched
pub struct Dictionary<W: Id> {
    tables: RwLock<Tables<W>>,
}

impl<W: Id> Dictionary<W> {
    /// Create a new empty dictionary
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }

    /// Decode a dictionary from a binary blob produced by [`Dictionary::marshal`]
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let records = binary::decode::<W>(raw)?;
        Ok(Self {
            tables: RwLock::new(Tables::from_records(records)),
        })
    }

    // =========================================================================
    // Lookup / Allocation
    // =========================================================================

    /// Get the id for `key`, allocating the next one on a miss.
    ///
    /// Fails with `InvalidKey` when a new key is empty, longer than
    /// `MAX_KEY_LEN` or contains the record separator, and with `Exhausted`
    /// once every id of this width has been handed out.
    pub fn get_id(&self, key: &str) -> Result<W> {
        if let Some(&id) = self.tables.read().forward.get(key) {
            return Ok(id);
        }

        validate_key(key)?;

        let mut tables = self.tables.write();

        // Another writer may have allocated it between the two locks
        if let Some(&id) = tables.forward.get(key) {
            return Ok(id);
        }

        let id = tables
            .last_id
            .checked_next()
            .ok_or(DictError::Exhausted { bits: W::BITS })?;
        tables.last_id = id;
        tables.forward.insert(key.to_owned(), id);
        tables.reverse.insert(id, key.to_owned());

        trace!(key, %id, "allocated id");
        Ok(id)
    }

    /// Get ids for a batch of keys, in order.
    ///
    /// Each key is resolved independently; the batch is not atomic.
    pub fn get_ids<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<W>> {
        keys.iter().map(|key| self.get_id(key.as_ref())).collect()
    }

    /// Get the id for `key` without allocating
    pub fn find_id(&self, key: &str) -> Option<W> {
        self.tables.read().forward.get(key).copied()
    }

    /// True if `key` has an id
    pub fn contains_key(&self, key: &str) -> bool {
        self.tables.read().forward.contains_key(key)
    }

    /// Get the key for `id`. Id 0 is never allocated.
    pub fn get_key(&self, id: W) -> Option<String> {
        self.tables.read().reverse.get(&id).cloned()
    }

    /// Get keys for a batch of ids, in order.
    ///
    /// Unknown ids yield an empty string at their position. Use
    /// [`Dictionary::lookup_keys`] to tell them apart.
    pub fn get_keys(&self, ids: &[W]) -> Vec<String> {
        let tables = self.tables.read();
        ids.iter()
            .map(|id| tables.reverse.get(id).cloned().unwrap_or_default())
            .collect()
    }

    /// Get keys for a batch of ids, in order, with `None` for unknown ids
    pub fn lookup_keys(&self, ids: &[W]) -> Vec<Option<String>> {
        let tables = self.tables.read();
        ids.iter().map(|id| tables.reverse.get(id).cloned()).collect()
    }

    /// All entries whose key starts with `prefix` (full scan, unordered)
    pub fn get_prefix(&self, prefix: &str) -> HashMap<String, W> {
        let tables = self.tables.read();
        tables
            .forward
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, &id)| (key.clone(), id))
            .collect()
    }

    // =========================================================================
    // Renames
    // =========================================================================

    /// Bind `id` to `new_key`, dropping its old key.
    ///
    /// Returns `Ok(false)` when `id` is not allocated, whatever `new_key` is.
    /// Otherwise fails with `InvalidKey` for a key [`validate_key`] rejects and
    /// with `KeyExists` if `new_key` already belongs to a different id.
    pub fn rename_id(&self, id: W, new_key: &str) -> Result<bool> {
        let mut tables = self.tables.write();
        let Some(old_key) = tables.reverse.get(&id).cloned() else {
            return Ok(false);
        };
        validate_key(new_key)?;
        tables.rename(id, &old_key, new_key)?;

        debug!(%id, old_key = %old_key, new_key, "renamed id");
        Ok(true)
    }

    /// Move the id of `old_key` over to `new_key`.
    ///
    /// Returns `Ok(false)` when `old_key` is unknown. Fails with `KeyExists`
    /// if `new_key` already belongs to a different id.
    pub fn rename_key(&self, old_key: &str, new_key: &str) -> Result<bool> {
        let mut tables = self.tables.write();
        let Some(&id) = tables.forward.get(old_key) else {
            return Ok(false);
        };
        validate_key(new_key)?;
        tables.rename(id, old_key, new_key)?;

        debug!(%id, old_key, new_key, "renamed key");
        Ok(true)
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// Number of keys
    pub fn count(&self) -> usize {
        self.tables.read().forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Highest id ever allocated (0 for a fresh dictionary)
    pub fn last_id(&self) -> W {
        self.tables.read().last_id
    }

    /// Copy of the id → key map
    pub fn all(&self) -> HashMap<W, String> {
        self.tables.read().reverse.clone()
    }

    // =========================================================================
    // Binary Persistence
    // =========================================================================

    /// Encode the dictionary into the checksummed binary format
    pub fn marshal(&self) -> Bytes {
        let tables = self.tables.read();
        binary::encode(
            tables.last_id,
            tables.forward.iter().map(|(key, &id)| (key.as_str(), id)),
        )
    }

    /// Replace the contents with a blob produced by [`Dictionary::marshal`].
    ///
    /// On error the dictionary keeps its previous contents.
    pub fn unmarshal(&self, raw: &[u8]) -> Result<usize> {
        let records = binary::decode::<W>(raw)?;
        Ok(self.replace(Tables::from_records(records)))
    }

    /// Write the binary encoding to `path`
    pub fn save_binary_file(&self, path: &Path) -> Result<()> {
        let raw = self.marshal();
        codec::write_file(path, &raw, false)?;
        debug!(path = %path.display(), bytes = raw.len(), "saved binary dictionary");
        Ok(())
    }

    /// Replace the contents with the binary file at `path`
    pub fn load_binary_file(&self, path: &Path) -> Result<usize> {
        let raw = codec::read_file(path, false)?;
        let count = self.unmarshal(&raw)?;
        debug!(path = %path.display(), entries = count, "loaded binary dictionary");
        Ok(count)
    }

    // =========================================================================
    // Text Persistence
    // =========================================================================

    /// Write `id;key` lines, sorted by id
    pub fn write_text<Wr: Write>(&self, writer: &mut Wr) -> Result<()> {
        // Copy out first so the lock is not held across I/O
        let entries = self.tables.read().sorted_entries();
        text::write(writer, &entries)
    }

    /// Replace the contents with `id;key` lines. Malformed lines are skipped.
    pub fn read_text<R: BufRead>(&self, reader: R) -> Result<usize> {
        let records = text::read::<W, R>(reader)?;
        Ok(self.replace(Tables::from_records(records)))
    }

    /// Write the text format to `path`
    pub fn save_text_file(&self, path: &Path) -> Result<()> {
        let mut out = Vec::new();
        self.write_text(&mut out)?;
        codec::write_file(path, &out, false)?;
        debug!(path = %path.display(), bytes = out.len(), "saved text dictionary");
        Ok(())
    }

    /// Replace the contents with the text file at `path`, creating an
    /// empty file if it does not exist
    pub fn load_text_file(&self, path: &Path) -> Result<usize> {
        let raw = codec::read_file(path, true)?;
        let count = self.read_text(raw.as_slice())?;
        debug!(path = %path.display(), entries = count, "loaded text dictionary");
        Ok(count)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Swap in freshly decoded tables, returning the new entry count
    fn replace(&self, tables: Tables<W>) -> usize {
        let count = tables.forward.len();
        *self.tables.write() = tables;
        count
    }
}

impl<W: Id> Default for Dictionary<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Id> std::fmt::Debug for Dictionary<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("Dictionary")
            .field("width", &W::WIDTH)
            .field("count", &tables.forward.len())
            .field("last_id", &tables.last_id)
            .finish()
    }
}
