//! Store Module
//!
//! Binds a dictionary to a file on disk.
//!
//! ## Responsibilities
//! - Check the configured width against the dictionary's id type
//! - Load the file on open (creating it if allowed)
//! - Save/reload/export in the configured format

use std::io;
use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::codec;
use crate::config::{Config, Format};
use crate::dictionary::Dictionary;
use crate::error::{DictError, Result};
use crate::id::Id;

/// A dictionary persisted to `config.path`
///
/// ## Concurrency Model
///
/// - Dictionary reads and writes go straight to the dictionary's own RwLock
/// - `save`/`reload`/`export` are serialized by `write_lock` so two saves
///   never race on the same temp file
/// - Encoding happens under the dictionary's read lock; the file write
///   happens after it is released
pub struct Store<W: Id> {
    /// Store configuration
    config: Config,

    /// The in-memory dictionary
    dict: Dictionary<W>,

    /// Serializes file operations
    write_lock: Mutex<()>,
}

impl<W: Id> Store<W> {
    /// Open the dictionary file described by `config`
    ///
    /// On startup:
    /// 1. Check `config.width` matches `W`
    /// 2. Load the file if it exists
    /// 3. Otherwise create an empty one (if `create_if_missing`)
    pub fn open(config: Config) -> Result<Self> {
        if config.width != W::WIDTH {
            return Err(DictError::Config(format!(
                "store configured for {} ids, opened with {} ids",
                config.width,
                W::WIDTH
            )));
        }

        let store = Self {
            config,
            dict: Dictionary::new(),
            write_lock: Mutex::new(()),
        };

        match store.load() {
            Ok(count) => {
                info!(
                    path = %store.config.path.display(),
                    entries = count,
                    last_id = %store.dict.last_id(),
                    "opened dictionary"
                );
            }
            Err(DictError::Io(e))
                if e.kind() == io::ErrorKind::NotFound && store.config.create_if_missing =>
            {
                info!(path = %store.config.path.display(), "creating new dictionary");
                store.save()?;
            }
            Err(e) => return Err(e),
        }

        Ok(store)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified file and this store's width
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().path(path).width(W::WIDTH).build();
        Self::open(config)
    }

    /// The underlying dictionary
    pub fn dictionary(&self) -> &Dictionary<W> {
        &self.dict
    }

    /// Write the dictionary to `config.path` in `config.format`
    pub fn save(&self) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.write_to(&self.config.path, self.config.format)
    }

    /// Re-read `config.path`, replacing the in-memory contents.
    ///
    /// On error the in-memory contents are left unchanged.
    pub fn reload(&self) -> Result<usize> {
        let _write_guard = self.write_lock.lock();
        self.load()
    }

    /// Write the dictionary to another file, possibly in another format
    pub fn export(&self, path: &Path, format: Format) -> Result<()> {
        let _write_guard = self.write_lock.lock();
        self.write_to(path, format)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the dictionary file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Consume the store, returning the dictionary
    pub fn into_dictionary(self) -> Dictionary<W> {
        self.dict
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn load(&self) -> Result<usize> {
        let raw = codec::read_file(&self.config.path, false)?;
        match self.config.format {
            Format::Binary => self.dict.unmarshal(&raw),
            Format::Text => self.dict.read_text(raw.as_slice()),
        }
    }

    fn write_to(&self, path: &Path, format: Format) -> Result<()> {
        let raw = match format {
            Format::Binary => self.dict.marshal().to_vec(),
            Format::Text => {
                let mut out = Vec::new();
                self.dict.write_text(&mut out)?;
                out
            }
        };

        codec::write_file(path, &raw, self.config.sync_on_save)?;

        debug!(
            path = %path.display(),
            ?format,
            bytes = raw.len(),
            "saved dictionary"
        );
        Ok(())
    }
}
