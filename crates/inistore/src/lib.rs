//! Inistore
//!
//! A small library for line-oriented, section-delimited config files:
//! `[SECTION]` headers with `key=value` entries beneath them. The file is
//! loaded once into an in-memory lookup, reads fall back to a caller-supplied
//! default, and writes edit the backing file in place before rebuilding the
//! lookup from it.
//!
//! The format is a flat two-level model. Sections and keys are matched
//! case-insensitively, values are plain text trimmed only on read. There are
//! no nested sections, no escaping rules and no type coercion; the loose
//! header and entry detection rules of existing files are preserved rather
//! than tightened.
//!
//! ```no_run
//! use inistore::IniStore;
//!
//! let mut store = IniStore::open("settings.ini")?;
//!
//! let host = store.read_value("Server", "Host", "localhost")?;
//! store.write_value("Server", "Port", "9090")?;
//! # Ok::<(), inistore::IniError>(())
//! ```

pub mod error;
mod parse;
pub mod store;

// Re-export commonly used types
pub use error::{IniError, IniResult};
pub use store::IniStore;
