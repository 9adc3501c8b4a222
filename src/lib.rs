//! shellstrip - strip shared layout components out of page sources
//!
//! Pages that import and render site-wide components such as `Header` and
//! `Footer` duplicate what the root layout already renders. shellstrip finds
//! those pages and removes the imports and the rendered elements, copying each
//! original into a backup directory before it is touched.
//!
//! ## Pipeline
//!
//! For each source file under the root (see [`scanner`]):
//! 1. skip it if it is on the exclusion list or is the layout file
//! 2. classify it: eligible when at least one target component is both
//!    imported and rendered ([`classify`])
//! 3. back up the original ([`backup`])
//! 4. run the ordered rewrite passes and write the result back if it changed
//!    ([`rewrite`])
//!
//! Per-file failures are reported and the run moves on; only an inaccessible
//! root aborts it. Rewritten files no longer match the import pattern, so
//! running again is a no-op.

pub mod backup;
pub mod classify;
pub mod config;
pub mod error;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod rewrite;
pub mod scanner;

// Re-export commonly used items
pub use backup::{BackupRecord, BackupWriter};
pub use classify::{classify, is_excluded, Classification, ComponentMatch};
pub use config::StripConfig;
pub use error::{Result, StripError};
pub use patterns::{compile_patterns, ComponentPatterns};
pub use pipeline::{FileOutcome, Pipeline, RunOptions};
pub use report::{Reporter, RunSummary};
pub use rewrite::{Pass, Rewrite, Rewriter};
pub use scanner::{source_files, SourceFiles};
