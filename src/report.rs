//! Progress lines and the end-of-run tally.

use crate::config::StripConfig;
use crate::pipeline::{FileOutcome, RunOptions};
use colored::Colorize;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Aggregate counters for one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Every source file the walk produced, excluded ones included
    pub scanned: usize,
    pub excluded: usize,
    pub eligible: usize,
    pub backed_up: usize,
    /// Rewritten files; in a dry run, files that would be rewritten
    pub modified: usize,
    pub unchanged: usize,
    /// Per-file read, backup and write failures
    pub errors: usize,
    /// Directory entries the walk could not access
    pub walk_errors: usize,
    pub bytes_backed_up: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.scanned += 1;

        if outcome.is_eligible() {
            self.eligible += 1;
        }
        if let Some(backup) = outcome.backup() {
            self.backed_up += 1;
            self.bytes_backed_up += backup.bytes;
        }
        if outcome.error().is_some() {
            self.errors += 1;
        }

        match outcome {
            FileOutcome::Excluded => self.excluded += 1,
            FileOutcome::Modified { .. } => self.modified += 1,
            FileOutcome::Unchanged { .. } => self.unchanged += 1,
            _ => {}
        }
    }
}

/// Prints per-file progress to stdout and errors to stderr.
///
/// A spinner tracks the walk on interactive terminals; lines are printed
/// through it so they don't collide with the spinner.
pub struct Reporter {
    progress: ProgressBar,
    options: RunOptions,
    checked: u64,
}

impl Reporter {
    pub fn new(options: RunOptions) -> Self {
        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            progress.set_style(style);
        }
        progress.enable_steady_tick(Duration::from_millis(100));

        Reporter {
            progress,
            options,
            checked: 0,
        }
    }

    pub fn start(&self, config: &StripConfig) {
        let line = format!(
            "Scanning {} for .{} files",
            config.root.display(),
            config.extension
        );
        self.progress.suspend(|| {
            println!("{}", line.bold());
            if self.options.dry_run {
                println!("Dry run: nothing will be backed up or rewritten");
            } else {
                println!("Backup directory: {}", config.backup_dir.display());
            }
        });
    }

    pub fn checking(&mut self, path: &Path) {
        self.checked += 1;
        self.progress
            .set_message(format!("Checked {} files", self.checked));
        if self.options.verbose {
            self.progress
                .suspend(|| println!("DEBUG: Checking {}", path.display()));
        }
    }

    pub fn file(&self, path: &Path, outcome: &FileOutcome) {
        let verbose = self.options.verbose;
        self.progress.suspend(|| {
            if let Some(backup) = outcome.backup() {
                println!(
                    "Backed up {} -> {}",
                    path.display(),
                    backup.path.display()
                );
            } else if self.options.dry_run && outcome.is_eligible() {
                println!("Would back up {}", path.display());
            }

            match outcome {
                FileOutcome::Excluded => {
                    println!("{} {} (excluded)", "Skipping".yellow(), path.display());
                }
                FileOutcome::NotEligible(classification) => {
                    if verbose {
                        println!(
                            "{} {} (nothing to strip: {})",
                            "Skipping".yellow(),
                            path.display(),
                            classification.describe()
                        );
                    } else {
                        println!(
                            "{} {} (nothing to strip)",
                            "Skipping".yellow(),
                            path.display()
                        );
                    }
                }
                FileOutcome::Unchanged { .. } => {
                    println!("{} {}", "Unchanged".yellow(), path.display());
                }
                FileOutcome::Modified {
                    components, passes, ..
                } => {
                    let label = if self.options.dry_run {
                        "Would modify".cyan()
                    } else {
                        "Modified".green()
                    };
                    let passes: Vec<&str> = passes.iter().map(|p| p.name()).collect();
                    println!(
                        "{} {} ({}; {})",
                        label,
                        path.display(),
                        components.join(", "),
                        passes.join(", ")
                    );
                }
                FileOutcome::Unreadable(err) => {
                    eprintln!("{} {}", "Error:".red(), err);
                }
                FileOutcome::BackupFailed(err) => {
                    eprintln!("{} {}; file left unchanged", "Error:".red(), err);
                }
                FileOutcome::WriteFailed { backup, error } => {
                    eprintln!(
                        "{} {}; original kept at {}",
                        "Error:".red(),
                        error,
                        backup.path.display()
                    );
                }
            }
        });
    }

    pub fn walk_warning(&self, err: &ignore::Error) {
        self.progress
            .suspend(|| eprintln!("Warning: Failed to access entry: {}", err));
    }

    pub fn finish(&self, summary: &RunSummary) {
        self.progress.finish_and_clear();

        println!("========================================");
        println!("Files scanned:   {}", summary.scanned);
        println!("Files excluded:  {}", summary.excluded);
        println!("Files eligible:  {}", summary.eligible);
        if self.options.dry_run {
            println!("Files to modify: {}", summary.modified.to_string().bold());
            println!("Dry run mode: No files were written.");
        } else {
            println!(
                "Files backed up: {} ({})",
                summary.backed_up,
                format_size(summary.bytes_backed_up, BINARY)
            );
            println!("Files modified:  {}", summary.modified.to_string().bold());
        }

        let errors = summary.errors + summary.walk_errors;
        if errors > 0 {
            println!("Errors:          {}", errors.to_string().red());
        }
    }
}
