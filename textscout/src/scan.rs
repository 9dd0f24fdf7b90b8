use crossbeam_channel::{unbounded, Sender};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::classifier::{Classification, Utf8Classifier};
use crate::config::ScanRequest;
use crate::errors::{Result, ScanError};
use crate::filters::IgnoreFilter;
use crate::matcher::SubstringMatcher;
use crate::metrics::ScanMetrics;
use crate::progress::{NoReveal, RevealAction, ScanEvent, ScanObserver};
use crate::results::{FileOutcome, ScanResult, ScanSummary};
use crate::walker::{count_files, TreeWalker, WalkEvent};

/// Classification and matching for one file, shared by all workers
struct FileProcessor {
    classifier: Utf8Classifier,
    matcher: SubstringMatcher,
}

impl FileProcessor {
    /// Classifies first and only searches files that are text
    fn process(&self, path: &Path) -> FileOutcome {
        match self.classifier.classify(path) {
            Classification::IsBinary => FileOutcome::NotMatched,
            Classification::ReadError(reason) => {
                debug!("Cannot classify {}: {}", path.display(), reason);
                FileOutcome::Error(reason)
            }
            Classification::IsText => match self.matcher.try_matches_file(path) {
                Ok(true) => FileOutcome::Matched,
                Ok(false) => FileOutcome::NotMatched,
                Err(e) => {
                    warn!("{}", e);
                    FileOutcome::Error(match e {
                        ScanError::FileReadError { reason, .. } => reason,
                        other => other.to_string(),
                    })
                }
            },
        }
    }
}

/// Scans `request.root_path` without a reveal hook
pub fn scan(request: &ScanRequest, observer: &mut dyn ScanObserver) -> Result<ScanSummary> {
    scan_with_reveal(request, observer, &NoReveal)
}

/// Runs a full scan.
///
/// Files are pulled lazily from a [`TreeWalker`] by a rayon pool of
/// `request.thread_count` workers. Every worker classifies, matches and
/// records its file on its own; events reach `observer` through a channel
/// drained on the calling thread. Failures below the root never abort the
/// scan, they are counted and reported as events. A root that cannot be
/// listed fails with [`ScanError::DirectoryAccessDenied`].
pub fn scan_with_reveal(
    request: &ScanRequest,
    observer: &mut dyn ScanObserver,
    reveal: &dyn RevealAction,
) -> Result<ScanSummary> {
    request.validate()?;
    open_root(&request.root_path)?;
    info!(
        "Starting scan of {} for {:?} (case sensitive: {})",
        request.root_path.display(),
        request.search_term,
        request.case_sensitive
    );
    let started = Instant::now();

    let filter = IgnoreFilter::new(&request.root_path, &request.ignore_patterns)?;
    let metrics = Arc::new(ScanMetrics::new());

    let total = if request.count_files_first {
        match count_files(&request.root_path, &filter) {
            Ok(total) => {
                observer.on_event(&ScanEvent::Counted { total });
                Some(total)
            }
            Err(e) => {
                warn!("{}", e);
                observer.on_event(&ScanEvent::CountFailed {
                    reason: e.to_string(),
                });
                None
            }
        }
    } else {
        None
    };

    let walker = TreeWalker::with_filter(&request.root_path, filter).with_metrics(Arc::clone(&metrics));
    let summary = drive(request, walker, total, &metrics, observer, reveal)?;
    let summary = ScanSummary {
        elapsed: started.elapsed(),
        ..summary
    };
    info!(
        "Scan complete. {} of {} files matched ({} errors, {} inaccessible directories)",
        summary.files_matched,
        summary.files_scanned,
        summary.errors,
        summary.inaccessible_dirs.len()
    );
    Ok(summary)
}

/// Fails when the root directory itself cannot be listed
fn open_root(root: &Path) -> Result<()> {
    fs::read_dir(root)
        .map(|_| ())
        .map_err(|e| ScanError::directory_access_denied(root, e))
}

/// Fans the walk out over the worker pool and feeds `observer` until every
/// event has been delivered
fn drive<I>(
    request: &ScanRequest,
    walker: I,
    total: Option<usize>,
    metrics: &Arc<ScanMetrics>,
    observer: &mut dyn ScanObserver,
    reveal: &dyn RevealAction,
) -> Result<ScanSummary>
where
    I: Iterator<Item = WalkEvent> + Send,
{
    let started = Instant::now();
    let processor = FileProcessor {
        classifier: Utf8Classifier::with_metrics(request.chunk_boundary(), Arc::clone(metrics)),
        matcher: SubstringMatcher::new(&request.search_term, request.case_sensitive)?,
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(request.thread_count.get())
        .thread_name(|i| format!("textscout-worker-{}", i))
        .build()
        .map_err(|e| ScanError::config_error(format!("failed to build thread pool: {}", e)))?;
    debug!("Using {} worker threads", pool.current_num_threads());

    let result = ScanResult::new();
    let (tx, rx) = unbounded::<ScanEvent>();

    thread::scope(|scope| {
        let result = &result;
        let processor = &processor;
        scope.spawn(move || {
            pool.install(|| {
                walker.par_bridge().for_each_with(tx, |tx, event| match event {
                    WalkEvent::File(task) => {
                        let outcome = processor.process(&task.path);
                        let index = result.record(&task.path, &outcome);
                        trace!("{} -> {}", task.path.display(), outcome);
                        if outcome.is_match() && request.reveal_matches {
                            metrics.record_reveal();
                            reveal_match(reveal, &task.path, tx);
                        }
                        let _ = tx.send(ScanEvent::FileScanned {
                            index,
                            total,
                            path: task.path,
                            outcome,
                        });
                    }
                    WalkEvent::Denied { path, reason } => {
                        result.record_inaccessible(&path);
                        let _ = tx.send(ScanEvent::DirectoryDenied { path, reason });
                    }
                });
            });
        });

        // Single consumer; ends once every worker dropped its sender
        for event in rx.iter() {
            observer.on_event(&event);
        }
    });

    metrics.log_stats();
    Ok(result.finalize(total, started.elapsed()))
}

fn reveal_match(reveal: &dyn RevealAction, path: &Path, tx: &Sender<ScanEvent>) {
    if let Err(e) = reveal.reveal(path) {
        warn!("Failed to reveal {}: {}", path.display(), e);
        let _ = tx.send(ScanEvent::RevealFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        });
    }
}
