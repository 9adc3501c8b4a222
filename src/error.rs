//! Error taxonomy for a strip run.
//!
//! Only `RootAccess`, `Config` and `Pattern` end a run. The per-file variants
//! are reported by the driver and the run moves on to the next file.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StripError {
    /// Root directory is missing, unreadable or not a directory
    #[error("cannot access root directory {}: {source}", path.display())]
    RootAccess { path: PathBuf, source: io::Error },

    /// A candidate file could not be read (permissions, invalid UTF-8)
    #[error("failed to read {}: {source}", path.display())]
    FileRead { path: PathBuf, source: io::Error },

    /// The backup copy could not be created; the source is left untouched
    #[error("failed to back up {} to {}: {source}", path.display(), backup_dir.display())]
    BackupWrite {
        path: PathBuf,
        backup_dir: PathBuf,
        source: io::Error,
    },

    /// Rewritten content could not be written back; the backup still exists
    #[error("failed to write {}: {source}", path.display())]
    FileWrite { path: PathBuf, source: io::Error },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid pattern for component '{name}': {source}")]
    Pattern { name: String, source: regex::Error },
}

pub type Result<T> = std::result::Result<T, StripError>;
