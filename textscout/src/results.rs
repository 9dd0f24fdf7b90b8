use dashmap::DashSet;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Matched,
    NotMatched,
    Error(String),
}

impl FileOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, FileOutcome::Matched)
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Matched => write!(f, "Found"),
            FileOutcome::NotMatched => write!(f, "Not Found"),
            FileOutcome::Error(reason) => write!(f, "Error ({})", reason),
        }
    }
}

/// Aggregate shared by all workers of a running scan.
///
/// Counters only ever grow and a path is stored at most once, so workers can
/// record outcomes without any coordination beyond the atomics and the
/// concurrent sets.
#[derive(Debug, Default)]
pub struct ScanResult {
    files_scanned: AtomicUsize,
    errors: AtomicUsize,
    matched: DashSet<PathBuf>,
    inaccessible: DashSet<PathBuf>,
}

impl ScanResult {
    /// Creates a new empty scan result
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a processed file and returns its 1-based sequence number
    pub fn record(&self, path: &Path, outcome: &FileOutcome) -> usize {
        match outcome {
            FileOutcome::Matched => {
                self.matched.insert(path.to_path_buf());
            }
            FileOutcome::Error(_) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
            }
            FileOutcome::NotMatched => {}
        }
        self.files_scanned.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a directory that could not be listed
    pub fn record_inaccessible(&self, path: &Path) {
        self.inaccessible.insert(path.to_path_buf());
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned.load(Ordering::Relaxed)
    }

    pub fn files_matched(&self) -> usize {
        self.matched.len()
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Freezes the result once every file has been processed
    pub fn finalize(self, total_files: Option<usize>, elapsed: Duration) -> ScanSummary {
        let mut matched_paths: Vec<PathBuf> = self.matched.into_iter().collect();
        matched_paths.sort();
        let mut inaccessible_dirs: Vec<PathBuf> = self.inaccessible.into_iter().collect();
        inaccessible_dirs.sort();

        ScanSummary {
            files_scanned: self.files_scanned.into_inner(),
            files_matched: matched_paths.len(),
            errors: self.errors.into_inner(),
            total_files,
            matched_paths,
            inaccessible_dirs,
            elapsed,
        }
    }
}

/// Read-only result of a completed scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_matched: usize,
    pub errors: usize,
    /// Advisory total from the pre-count pass, if one ran
    pub total_files: Option<usize>,
    pub matched_paths: Vec<PathBuf>,
    pub inaccessible_dirs: Vec<PathBuf>,
    pub elapsed: Duration,
}
