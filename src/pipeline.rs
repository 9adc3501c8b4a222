//! Per-file driver: exclusion, classification, backup, rewrite, write-back.
//!
//! Files are handled one at a time, in walk order. Errors tied to a single
//! file become a [`FileOutcome`] and never stop the run; only an inaccessible
//! root does.

use crate::backup::{BackupRecord, BackupWriter};
use crate::classify::{classify, is_excluded, Classification};
use crate::config::StripConfig;
use crate::error::{Result, StripError};
use crate::patterns::{compile_patterns, ComponentPatterns};
use crate::report::{Reporter, RunSummary};
use crate::rewrite::{Pass, Rewriter};
use crate::scanner::source_files;
use std::fs;
use std::path::Path;

/// Options controlling run behavior (runtime flags)
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Classify and rewrite in memory only; nothing is written
    pub dry_run: bool,
    pub verbose: bool,
}

/// What happened to one source file
#[derive(Debug)]
pub enum FileOutcome {
    /// On the exclusion list or the layout file; never read
    Excluded,
    NotEligible(Classification),
    /// Could not be read, treated as not eligible
    Unreadable(StripError),
    /// Eligible, but the backup failed so the file was left alone
    BackupFailed(StripError),
    /// Eligible, but the passes produced identical content
    Unchanged { backup: Option<BackupRecord> },
    /// Rewritten in place (or, in a dry run, would be)
    Modified {
        backup: Option<BackupRecord>,
        components: Vec<String>,
        passes: Vec<Pass>,
    },
    /// Backed up, but the rewritten content could not be written
    WriteFailed {
        backup: BackupRecord,
        error: StripError,
    },
}

impl FileOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(
            self,
            FileOutcome::BackupFailed(_)
                | FileOutcome::Unchanged { .. }
                | FileOutcome::Modified { .. }
                | FileOutcome::WriteFailed { .. }
        )
    }

    pub fn backup(&self) -> Option<&BackupRecord> {
        match self {
            FileOutcome::Unchanged { backup } | FileOutcome::Modified { backup, .. } => {
                backup.as_ref()
            }
            FileOutcome::WriteFailed { backup, .. } => Some(backup),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&StripError> {
        match self {
            FileOutcome::Unreadable(e) | FileOutcome::BackupFailed(e) => Some(e),
            FileOutcome::WriteFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub struct Pipeline {
    config: StripConfig,
    patterns: Vec<ComponentPatterns>,
    backups: BackupWriter,
    options: RunOptions,
}

impl Pipeline {
    /// Validate the configuration and compile the component patterns
    pub fn new(config: StripConfig, options: RunOptions) -> Result<Self> {
        config.validate()?;
        let patterns = compile_patterns(&config.components)?;
        let backups = BackupWriter::new(config.backup_dir.clone());

        Ok(Pipeline {
            config,
            patterns,
            backups,
            options,
        })
    }

    /// Walk the root and process every source file.
    ///
    /// Returns `RootAccess` if the root cannot be walked; everything else is
    /// recorded in the summary.
    pub fn run(&self, reporter: &mut Reporter) -> Result<RunSummary> {
        let files = source_files(&self.config)?;
        reporter.start(&self.config);

        let mut summary = RunSummary::default();
        for item in files {
            match item {
                Ok(path) => {
                    reporter.checking(&path);
                    let outcome = self.process_file(&path);
                    summary.record(&outcome);
                    reporter.file(&path, &outcome);
                }
                Err(err) => {
                    summary.walk_errors += 1;
                    reporter.walk_warning(&err);
                }
            }
        }

        reporter.finish(&summary);
        Ok(summary)
    }

    /// Classify, back up and rewrite a single file
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        if is_excluded(path, &self.config) {
            return FileOutcome::Excluded;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) => {
                return FileOutcome::Unreadable(StripError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let classification = classify(&content, &self.patterns);
        if !classification.is_eligible() {
            return FileOutcome::NotEligible(classification);
        }
        let components: Vec<String> = classification
            .present()
            .into_iter()
            .map(str::to_string)
            .collect();

        let rewrite = Rewriter::new(&self.patterns, &self.config.collapse_tags).rewrite(&content);

        if self.options.dry_run {
            return if rewrite.changed {
                FileOutcome::Modified {
                    backup: None,
                    components,
                    passes: rewrite.applied,
                }
            } else {
                FileOutcome::Unchanged { backup: None }
            };
        }

        // Never touch the source without a backup of what it held before
        let backup = match self.backups.backup(path, &content) {
            Ok(record) => record,
            Err(err) => return FileOutcome::BackupFailed(err),
        };

        if !rewrite.changed {
            return FileOutcome::Unchanged {
                backup: Some(backup),
            };
        }

        if let Err(source) = fs::write(path, &rewrite.content) {
            return FileOutcome::WriteFailed {
                backup,
                error: StripError::FileWrite {
                    path: path.to_path_buf(),
                    source,
                },
            };
        }

        FileOutcome::Modified {
            backup: Some(backup),
            components,
            passes: rewrite.applied,
        }
    }
}
