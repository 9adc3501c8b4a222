//! Run configuration.
//!
//! Settings come from three layers, later ones winning:
//! 1. `defaults.toml`, embedded in the binary at compile time
//! 2. an optional user TOML file (`--config`), which may set any subset of keys
//! 3. command-line flags, applied by the binary on the returned value

use crate::error::{Result, StripError};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

// Embed the defaults directly in the binary at compile time
const DEFAULTS_TOML: &str = include_str!("../defaults.toml");

/// Everything the pipeline needs to know about a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StripConfig {
    /// Directory scanned for sources
    pub root: PathBuf,
    /// Where originals are copied before rewriting
    pub backup_dir: PathBuf,
    /// Source extension, without the leading dot
    pub extension: String,
    /// Base name of the root layout file, never rewritten
    pub layout_file: String,
    /// Paths that are never rewritten, matched as trailing path components
    pub exclude: Vec<PathBuf>,
    /// Target component names, e.g. "Header" and "Footer"
    pub components: Vec<String>,
    /// Directory names the walk never enters
    pub skip_dirs: Vec<String>,
    /// Block elements a lone fragment child may be collapsed into
    pub collapse_tags: Vec<String>,
}

/// A partial configuration, as found in a user file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    root: Option<PathBuf>,
    backup_dir: Option<PathBuf>,
    extension: Option<String>,
    layout_file: Option<String>,
    exclude: Option<Vec<PathBuf>>,
    components: Option<Vec<String>>,
    skip_dirs: Option<Vec<String>>,
    collapse_tags: Option<Vec<String>>,
}

impl StripConfig {
    /// The embedded defaults
    pub fn defaults() -> Result<Self> {
        let config: StripConfig = toml::from_str(DEFAULTS_TOML)
            .map_err(|e| StripError::Config(format!("embedded defaults: {e}")))?;
        Ok(config.normalized())
    }

    /// Defaults with the given TOML file layered on top
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| StripError::Config(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::defaults()?;
        config.merge_toml(&text).map_err(|e| match e {
            StripError::Config(msg) => StripError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        Ok(config)
    }

    /// Apply the keys present in `text` over the current values
    pub fn merge_toml(&mut self, text: &str) -> Result<()> {
        let layer: ConfigLayer =
            toml::from_str(text).map_err(|e| StripError::Config(e.to_string()))?;

        if let Some(root) = layer.root {
            self.root = root;
        }
        if let Some(backup_dir) = layer.backup_dir {
            self.backup_dir = backup_dir;
        }
        if let Some(extension) = layer.extension {
            self.extension = extension;
        }
        if let Some(layout_file) = layer.layout_file {
            self.layout_file = layout_file;
        }
        if let Some(exclude) = layer.exclude {
            self.exclude = exclude;
        }
        if let Some(components) = layer.components {
            self.components = components;
        }
        if let Some(skip_dirs) = layer.skip_dirs {
            self.skip_dirs = skip_dirs;
        }
        if let Some(collapse_tags) = layer.collapse_tags {
            self.collapse_tags = collapse_tags;
        }

        *self = std::mem::take(self).normalized();
        Ok(())
    }

    /// Strip a leading dot from the extension and `./` prefixes from exclusions
    pub fn normalized(mut self) -> Self {
        if let Some(ext) = self.extension.strip_prefix('.') {
            self.extension = ext.to_string();
        }
        self.exclude = self
            .exclude
            .iter()
            .map(|entry| {
                entry
                    .components()
                    .filter(|c| matches!(c, Component::Normal(_)))
                    .collect::<PathBuf>()
            })
            .collect();
        self
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(StripError::Config(
                "at least one component name is required".to_string(),
            ));
        }
        if let Some(bad) = self.components.iter().find(|n| !is_component_name(n)) {
            return Err(StripError::Config(format!(
                "'{bad}' is not a component name (expected e.g. Header)"
            )));
        }
        if self.extension.is_empty() {
            return Err(StripError::Config("extension must not be empty".to_string()));
        }
        if let Some(bad) = self.collapse_tags.iter().find(|t| !is_element_name(t)) {
            return Err(StripError::Config(format!(
                "'{bad}' is not an element name (expected e.g. main)"
            )));
        }
        Ok(())
    }
}

/// Components are referenced as capitalised identifiers in markup
fn is_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
