//! Source file discovery.

use crate::config::StripConfig;
use crate::error::{Result, StripError};
use ignore::{Walk, WalkBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lazy walk over the source files under the configured root.
///
/// Yields files carrying the configured extension, in file-name order. Walk
/// errors for individual entries are yielded as `Err` so the caller can report
/// them and carry on.
pub struct SourceFiles {
    walker: Walk,
    extension: String,
}

impl Iterator for SourceFiles {
    type Item = std::result::Result<PathBuf, ignore::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err)),
            };

            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            if is_file && has_extension(entry.path(), &self.extension) {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}

/// Start walking `config.root`.
///
/// Fails with `RootAccess` when the root is missing, unreadable or not a
/// directory. The backup directory and any directory named in `skip_dirs` are
/// never entered.
pub fn source_files(config: &StripConfig) -> Result<SourceFiles> {
    let root = config.root.as_path();
    check_root(root)?;

    let skip_dirs = config.skip_dirs.clone();
    let backup_dir = config.backup_dir.clone();
    let backup_canonical = fs::canonicalize(&backup_dir).ok();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        // Sources are matched by extension and exclusion list, not by VCS
        // ignore rules
        .git_ignore(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) || entry.depth() == 0 {
                return true;
            }

            let path = entry.path();
            let skipped_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| skip_dirs.iter().any(|s| s == name));

            !(skipped_name || is_same_dir(path, &backup_dir, backup_canonical.as_deref()))
        })
        .build();

    Ok(SourceFiles {
        walker,
        extension: config.extension.clone(),
    })
}

fn check_root(root: &Path) -> Result<()> {
    let access = |source: io::Error| StripError::RootAccess {
        path: root.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(root).map_err(access)?;
    if !metadata.is_dir() {
        return Err(access(io::Error::other("not a directory")));
    }
    // Listing catches a directory we can stat but not read
    fs::read_dir(root).map_err(access)?;
    Ok(())
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

fn is_same_dir(path: &Path, dir: &Path, dir_canonical: Option<&Path>) -> bool {
    if path == dir {
        return true;
    }
    match dir_canonical {
        Some(canonical) => fs::canonicalize(path).is_ok_and(|p| p == canonical),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_for(root: &Path) -> StripConfig {
        let mut config = StripConfig::defaults().unwrap();
        config.root = root.to_path_buf();
        config.backup_dir = root.join("backup");
        config
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_finds_nested_sources_in_order() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b/page.tsx"));
        touch(&dir.path().join("a/page.tsx"));
        touch(&dir.path().join("a/deep/er/card.tsx"));
        touch(&dir.path().join("a/notes.md"));
        touch(&dir.path().join("a/util.ts"));

        let found: Vec<PathBuf> = source_files(&config_for(dir.path()))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(
            found,
            vec![
                dir.path().join("a/deep/er/card.tsx"),
                dir.path().join("a/page.tsx"),
                dir.path().join("b/page.tsx"),
            ]
        );
    }

    #[test]
    fn test_skips_configured_dirs_and_backup_dir() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("page.tsx"));
        touch(&dir.path().join("node_modules/lib/index.tsx"));
        touch(&dir.path().join("backup/page.tsx"));
        touch(&dir.path().join(".next/cache.tsx"));

        let found: Vec<PathBuf> = source_files(&config_for(dir.path()))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(found, vec![dir.path().join("page.tsx")]);
    }

    #[test]
    fn test_hidden_dirs_are_walked() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join(".drafts/page.tsx"));

        let found: Vec<_> = source_files(&config_for(dir.path())).unwrap().collect();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let result = source_files(&config_for(&dir.path().join("missing")));
        assert!(matches!(result, Err(StripError::RootAccess { .. })));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("page.tsx");
        touch(&file);
        let result = source_files(&config_for(&file));
        assert!(matches!(result, Err(StripError::RootAccess { .. })));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("app/page.tsx"), "tsx"));
        assert!(!has_extension(Path::new("app/page.ts"), "tsx"));
        assert!(!has_extension(Path::new("app/tsx"), "tsx"));
    }
}
