//! # tagdict
//!
//! A bidirectional string interning dictionary with:
//! - Small fixed-width ids (`u8`, `u16` or `u32`), allocated from 1 upwards
//! - Forward (key → id) and reverse (id → key) lookups
//! - Single-writer/multi-reader concurrency model
//! - A checksummed binary format and a plain-text format for persistence
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store<W>                             │
//! │              (file path, format, save/reload)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Dictionary<W>                            │
//! │         forward: key → id   reverse: id → key   (RwLock)     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Binary    │          │    Text     │
//!   │ (CRC32 + RS)│          │  (id;key)   │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use tagdict::Dict16;
//!
//! let dict = Dict16::new();
//! let id = dict.get_id("hello world!").unwrap();
//! assert_eq!(id, 1);
//! assert_eq!(dict.get_key(id).as_deref(), Some("hello world!"));
//!
//! let restored = Dict16::from_bytes(&dict.marshal()).unwrap();
//! assert_eq!(restored.get_id("hello world!").unwrap(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod id;

pub mod dictionary;
pub mod codec;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DictError, Result};
pub use config::{Config, Format, Width};
pub use id::Id;
pub use dictionary::{validate_key, Dictionary, MAX_KEY_LEN, MIN_KEY_LEN};
pub use codec::{Records, RECORD_SEPARATOR};
pub use store::Store;

/// Dictionary with 8-bit ids (at most 255 keys)
pub type Dict8 = Dictionary<u8>;

/// Dictionary with 16-bit ids
pub type Dict16 = Dictionary<u16>;

/// Dictionary with 32-bit ids
pub type Dict32 = Dictionary<u32>;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tagdict
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
