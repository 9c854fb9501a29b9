//! Dictionary Module
//!
//! In-memory bidirectional map between string keys and fixed-width ids.
//!
//! ## Responsibilities
//! - Allocate ids on first sight of a key (ids start at 1, never reused)
//! - Resolve ids back to keys
//! - Keep the forward and reverse maps exact inverses of each other
//! - Single-writer/multi-reader access pattern
//!
//! ## Data Structure Choice
//! Two HashMaps behind one `parking_lot::RwLock`:
//! - forward: key → id
//! - reverse: id → key
//! - last_id: high-water mark, pre-incremented on allocation
//!
//! The raw maps are never handed out; enumeration returns copies.

mod table;

use std::collections::HashMap;

use tracing::warn;

use crate::codec::{Records, RECORD_SEPARATOR};
use crate::error::{DictError, Result};
use crate::id::Id;

pub use table::Dictionary;

/// Shortest key accepted, in bytes
pub const MIN_KEY_LEN: usize = 1;

/// Longest key accepted, in bytes
pub const MAX_KEY_LEN: usize = 128;

/// Check that `key` can be stored and round-tripped through both formats.
///
/// Keys are 1..=128 bytes and may not contain the binary record separator
/// or a line break.
pub fn validate_key(key: &str) -> Result<()> {
    match key_problem(key) {
        Some(reason) => Err(DictError::InvalidKey(reason)),
        None => Ok(()),
    }
}

/// Why `key` cannot be stored, if it cannot
pub(crate) fn key_problem(key: &str) -> Option<String> {
    let len = key.len();
    if len < MIN_KEY_LEN {
        return Some("key is empty".to_string());
    }
    if len > MAX_KEY_LEN {
        return Some(format!("key is {} bytes (max {})", len, MAX_KEY_LEN));
    }
    if key.as_bytes().contains(&RECORD_SEPARATOR) {
        return Some(format!(
            "key contains the record separator byte 0x{:02x}",
            RECORD_SEPARATOR
        ));
    }
    if key.contains(|c| c == '\n' || c == '\r') {
        return Some("key contains a line break".to_string());
    }
    None
}

// =============================================================================
// Tables (the state guarded by the dictionary lock)
// =============================================================================

#[derive(Debug, Clone)]
pub(crate) struct Tables<W: Id> {
    pub(crate) forward: HashMap<String, W>,
    pub(crate) reverse: HashMap<W, String>,
    pub(crate) last_id: W,
}

impl<W: Id> Tables<W> {
    pub(crate) fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
            last_id: W::ZERO,
        }
    }

    /// Build tables from decoded records.
    ///
    /// A later record wins over an earlier one sharing its id or key, so the
    /// result is always a bijection. `last_id` never drops below the largest
    /// id present.
    pub(crate) fn from_records(records: Records<W>) -> Self {
        let mut tables = Self {
            forward: HashMap::with_capacity(records.entries.len()),
            reverse: HashMap::with_capacity(records.entries.len()),
            last_id: records.last_id,
        };

        let mut displaced = 0usize;
        for (id, key) in records.entries {
            if id > tables.last_id {
                tables.last_id = id;
            }
            if let Some(old_key) = tables.reverse.remove(&id) {
                tables.forward.remove(&old_key);
                displaced += 1;
            }
            if let Some(old_id) = tables.forward.remove(&key) {
                tables.reverse.remove(&old_id);
                displaced += 1;
            }
            tables.forward.insert(key.clone(), id);
            tables.reverse.insert(id, key);
        }

        if displaced > 0 {
            warn!(displaced, "records with duplicate ids or keys replaced earlier ones");
        }

        tables
    }

    /// Repoint `id` from `old_key` to `new_key`.
    pub(crate) fn rename(&mut self, id: W, old_key: &str, new_key: &str) -> Result<()> {
        if old_key == new_key {
            return Ok(());
        }
        if let Some(&other) = self.forward.get(new_key) {
            return Err(DictError::KeyExists(format!(
                "{:?} is id {}, cannot rename id {} onto it",
                new_key, other, id
            )));
        }

        self.forward.remove(old_key);
        self.forward.insert(new_key.to_owned(), id);
        self.reverse.insert(id, new_key.to_owned());
        Ok(())
    }

    /// Entries sorted by id
    pub(crate) fn sorted_entries(&self) -> Vec<(W, String)> {
        let mut entries: Vec<(W, String)> = self
            .reverse
            .iter()
            .map(|(&id, key)| (id, key.clone()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }
}
