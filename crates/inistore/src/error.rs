//! Error types for loading and editing config files

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or editing a config file
#[derive(Debug, Error)]
pub enum IniError {
    /// The backing file did not exist when the store was opened
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A required string parameter was empty or missing
    #[error("parameter `{param}` is empty or missing")]
    InvalidArgument { param: &'static str },

    /// Two lines collapsed to the same section+key lookup token within one load
    #[error("duplicate key `{key}` while loading config")]
    DuplicateKey { key: String },

    /// An underlying read or write failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type IniResult<T> = Result<T, IniError>;
