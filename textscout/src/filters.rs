use glob::Pattern;
use std::path::{Path, PathBuf};

use crate::errors::{Result, ScanError};

/// Glob based exclusion of files and directories below a scan root.
///
/// Patterns are matched against the path relative to the root and against
/// the bare file name, so `target` excludes every directory called `target`
/// while `docs/*.md` only applies at that location.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    root: PathBuf,
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    /// Compiles `patterns`; an invalid glob is a configuration error
    pub fn new(root: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p)
                    .map_err(|e| ScanError::config_error(format!("invalid ignore pattern '{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            root: root.into(),
            patterns,
        })
    }

    /// A filter that excludes nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks if a file or directory should be skipped
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let name = path.file_name().map(|n| n.to_string_lossy());
        self.patterns.iter().any(|pattern| {
            pattern.matches_path(relative)
                || name.as_deref().is_some_and(|n| pattern.matches(n))
        })
    }
}
