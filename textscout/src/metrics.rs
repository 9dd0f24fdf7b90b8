use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::classifier::Classification;

/// Tracks throughput counters for a scan
#[derive(Debug, Default)]
pub struct ScanMetrics {
    bytes_classified: AtomicU64,

    // Classification outcomes
    text_files: AtomicU64,
    binary_files: AtomicU64,
    unreadable_files: AtomicU64,

    // Traversal
    directories_listed: AtomicU64,
    directories_denied: AtomicU64,

    reveals_requested: AtomicU64,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records bytes read by the classifier
    pub fn record_bytes(&self, bytes: u64) {
        self.bytes_classified.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Records the outcome of classifying one file
    pub fn record_classification(&self, outcome: &Classification) {
        let counter = match outcome {
            Classification::IsText => &self.text_files,
            Classification::IsBinary => &self.binary_files,
            Classification::ReadError(_) => &self.unreadable_files,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a directory listing attempt
    pub fn record_directory(&self, listed: bool) {
        if listed {
            self.directories_listed.fetch_add(1, Ordering::Relaxed);
        } else {
            let denied = self.directories_denied.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Directories denied so far: {}", denied);
        }
    }

    pub fn record_reveal(&self) {
        self.reveals_requested.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets a snapshot of the counters
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            bytes_classified: self.bytes_classified.load(Ordering::Relaxed),
            text_files: self.text_files.load(Ordering::Relaxed),
            binary_files: self.binary_files.load(Ordering::Relaxed),
            unreadable_files: self.unreadable_files.load(Ordering::Relaxed),
            directories_listed: self.directories_listed.load(Ordering::Relaxed),
            directories_denied: self.directories_denied.load(Ordering::Relaxed),
            reveals_requested: self.reveals_requested.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Bytes classified: {}\n\
             Files (text/binary/unreadable): {}/{}/{}\n\
             Directories (listed/denied): {}/{}\n\
             Reveals requested: {}",
            stats.bytes_classified,
            stats.text_files,
            stats.binary_files,
            stats.unreadable_files,
            stats.directories_listed,
            stats.directories_denied,
            stats.reveals_requested
        );
    }
}

/// Point-in-time copy of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub bytes_classified: u64,
    pub text_files: u64,
    pub binary_files: u64,
    pub unreadable_files: u64,
    pub directories_listed: u64,
    pub directories_denied: u64,
    pub reveals_requested: u64,
}
