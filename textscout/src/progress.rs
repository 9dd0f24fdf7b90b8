//! Progress events and the hooks a front end plugs into a scan.
//!
//! Workers never write to the console themselves. They send [`ScanEvent`]s
//! over a channel and the thread that called [`crate::scan`] hands them one
//! at a time to a [`ScanObserver`], which therefore never needs locking and
//! never sees interleaved output.

use std::io;
use std::path::{Path, PathBuf};

use crate::results::FileOutcome;

/// Progress update emitted during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The pre-count pass finished
    Counted { total: usize },
    /// The pre-count pass failed; the scan continues without a total
    CountFailed { reason: String },
    /// One file went through classification and matching
    FileScanned {
        /// 1-based position in completion order
        index: usize,
        total: Option<usize>,
        path: PathBuf,
        outcome: FileOutcome,
    },
    /// A directory could not be listed and was skipped
    DirectoryDenied { path: PathBuf, reason: String },
    /// The reveal hook failed for a matched file
    RevealFailed { path: PathBuf, reason: String },
}

/// Receives scan events on the calling thread
pub trait ScanObserver {
    fn on_event(&mut self, event: &ScanEvent);
}

/// Observer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn on_event(&mut self, _event: &ScanEvent) {}
}

/// Collects events, mostly useful in tests
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<ScanEvent>,
}

impl ScanObserver for EventLog {
    fn on_event(&mut self, event: &ScanEvent) {
        self.events.push(event.clone());
    }
}

impl<F> ScanObserver for F
where
    F: FnMut(&ScanEvent),
{
    fn on_event(&mut self, event: &ScanEvent) {
        self(event)
    }
}

/// Side effect run once for every matched file, such as selecting the file
/// in the platform file manager. Called from worker threads.
pub trait RevealAction: Send + Sync {
    fn reveal(&self, path: &Path) -> io::Result<()>;
}

/// Reveal hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReveal;

impl RevealAction for NoReveal {
    fn reveal(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}
