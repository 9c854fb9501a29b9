//! Configuration for tagdict
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{DictError, Result};

/// Configuration for a file-backed dictionary [`Store`](crate::Store)
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Dictionary file. Written via `{path}.tmp` + rename on save.
    pub path: PathBuf,

    /// On-disk format of `path`
    pub format: Format,

    /// Create an empty file when `path` does not exist
    pub create_if_missing: bool,

    /// fsync the file (and the rename) after every save
    pub sync_on_save: bool,

    // -------------------------------------------------------------------------
    // Dictionary Configuration
    // -------------------------------------------------------------------------
    /// Identifier width. Not stored in the file, so it must match the
    /// width the file was written with.
    pub width: Width,
}

/// Identifier width of a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
        }
    }

    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(Width::W8),
            16 => Ok(Width::W16),
            32 => Ok(Width::W32),
            other => Err(DictError::Config(format!(
                "unsupported id width: {} (expected 8, 16 or 32)",
                other
            ))),
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Persistence format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Checksummed binary records
    Binary,

    /// `id;key` lines, no integrity check
    Text,
}

impl FromStr for Format {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "bin" => Ok(Format::Binary),
            "text" | "txt" => Ok(Format::Text),
            other => Err(DictError::Config(format!("unknown format: {}", other))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./tagdict.dat"),
            format: Format::Binary,
            create_if_missing: true,
            sync_on_save: false,
            width: Width::W16,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the dictionary file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the on-disk format
    pub fn format(mut self, format: Format) -> Self {
        self.config.format = format;
        self
    }

    /// Set whether a missing file is created on open
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Set whether saves are fsynced
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.config.sync_on_save = sync;
        self
    }

    /// Set the identifier width
    pub fn width(mut self, width: Width) -> Self {
        self.config.width = width;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
