//! Backup copies of originals, written before a file is rewritten.

use crate::error::{Result, StripError};
use std::ffi::{OsStr, OsString};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A backup written for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Writes pre-rewrite copies into a single flat backup directory.
///
/// Copies are named after the source's base name. When that name is taken the
/// copy gets `.1`, `.2`, ... appended, so earlier backups are never
/// overwritten, including ones left by previous runs.
#[derive(Debug, Clone)]
pub struct BackupWriter {
    dir: PathBuf,
}

impl BackupWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        BackupWriter { dir: dir.into() }
    }

    /// Write `content` as the backup of `source`
    pub fn backup(&self, source: &Path, content: &str) -> Result<BackupRecord> {
        let fail = |source_err: io::Error| StripError::BackupWrite {
            path: source.to_path_buf(),
            backup_dir: self.dir.clone(),
            source: source_err,
        };

        let base = source.file_name().ok_or_else(|| {
            fail(io::Error::new(
                io::ErrorKind::InvalidInput,
                "source path has no file name",
            ))
        })?;

        fs::create_dir_all(&self.dir).map_err(fail)?;

        let mut attempt = 0;
        let (candidate, mut file) = loop {
            let candidate = self.dir.join(candidate_name(base, attempt));
            // create_new refuses to open an existing file, so a name taken
            // between runs or mid-run is skipped too
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => break (candidate, file),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => return Err(fail(err)),
            }
        };

        if let Err(err) = file.write_all(content.as_bytes()).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&candidate);
            return Err(fail(err));
        }

        Ok(BackupRecord {
            path: candidate,
            bytes: content.len() as u64,
        })
    }
}

/// `page.tsx`, `page.tsx.1`, `page.tsx.2`, ...
fn candidate_name(base: &OsStr, attempt: usize) -> OsString {
    let mut name = base.to_os_string();
    if attempt > 0 {
        name.push(format!(".{attempt}"));
    }
    name
}
