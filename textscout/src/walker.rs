use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::errors::{Result, ScanError};
use crate::filters::IgnoreFilter;
use crate::metrics::ScanMetrics;

/// A single file waiting to be classified
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTask {
    pub path: PathBuf,
}

/// Item produced by [`TreeWalker`]
#[derive(Debug)]
pub enum WalkEvent {
    File(FileTask),
    /// A directory that could not be listed; nothing below it is visited
    Denied { path: PathBuf, reason: String },
}

/// Lazy depth-first enumeration of every regular file below a root.
///
/// Pending directories live on an explicit stack, so the depth of the tree
/// never reaches the call stack. Links to files are yielded like the files
/// themselves; links to directories are never descended into, so link cycles
/// cannot occur.
#[derive(Debug)]
pub struct TreeWalker {
    stack: Vec<PathBuf>,
    pending: VecDeque<PathBuf>,
    denied: VecDeque<(PathBuf, String)>,
    filter: IgnoreFilter,
    metrics: Arc<ScanMetrics>,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_filter(root, IgnoreFilter::none())
    }

    pub fn with_filter(root: impl Into<PathBuf>, filter: IgnoreFilter) -> Self {
        Self {
            stack: vec![root.into()],
            pending: VecDeque::new(),
            denied: VecDeque::new(),
            filter,
            metrics: Arc::new(ScanMetrics::new()),
        }
    }

    /// Records directory listings into shared metrics
    pub fn with_metrics(mut self, metrics: Arc<ScanMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Lists one directory, queuing its files and pushing its subdirectories
    fn expand(&mut self, dir: PathBuf) {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping inaccessible directory {}: {}", dir.display(), e);
                self.metrics.record_directory(false);
                self.denied.push_back((dir, e.to_string()));
                return;
            }
        };
        self.metrics.record_directory(true);

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    debug!("No file type for {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if self.filter.is_ignored(&path) {
                trace!("Ignoring {}", path.display());
                continue;
            }
            if file_type.is_dir() {
                self.stack.push(path);
            } else if file_type.is_file() {
                self.pending.push_back(path);
            } else if file_type.is_symlink() {
                match fs::metadata(&path) {
                    Ok(target) if target.is_file() => self.pending.push_back(path),
                    Ok(_) => trace!("Not following directory link {}", path.display()),
                    Err(e) => debug!("Dangling link {}: {}", path.display(), e),
                }
            }
        }
    }
}

impl Iterator for TreeWalker {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        loop {
            if let Some((path, reason)) = self.denied.pop_front() {
                return Some(WalkEvent::Denied { path, reason });
            }
            if let Some(path) = self.pending.pop_front() {
                return Some(WalkEvent::File(FileTask { path }));
            }
            let dir = self.stack.pop()?;
            self.expand(dir);
        }
    }
}

/// Sequential pre-count of the files a scan will visit.
///
/// Denied subdirectories are skipped like in the scan itself; only a root
/// that cannot be listed fails the count.
pub fn count_files(root: &Path, filter: &IgnoreFilter) -> Result<usize> {
    fs::read_dir(root)
        .map_err(|e| ScanError::counting_failed(format!("{}: {}", root.display(), e)))?;

    let count = TreeWalker::with_filter(root, filter.clone())
        .filter(|event| matches!(event, WalkEvent::File(_)))
        .count();
    debug!("Counted {} files under {}", count, root.display());
    Ok(count)
}
