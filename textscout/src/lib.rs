//! Recursive content search restricted to UTF-8 text files.
//!
//! A scan walks the tree below a root directory, sniffs every regular file
//! for UTF-8 validity and searches the text files line by line for a literal
//! term. Unreadable directories and files are reported and skipped; only an
//! invalid root or an empty term stop a scan.
//!
//! ```rust,no_run
//! use textscout::{scan, NoopObserver, ScanRequest};
//!
//! let request = ScanRequest::new("/tmp", "needle").with_case_sensitive(true);
//! let summary = scan(&request, &mut NoopObserver)?;
//! for path in &summary.matched_paths {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), textscout::ScanError>(())
//! ```

pub mod classifier;
pub mod config;
pub mod errors;
pub mod filters;
pub mod matcher;
pub mod metrics;
pub mod progress;
pub mod results;
pub mod scan;
pub mod walker;

pub use classifier::{is_utf8_file, is_valid_utf8, ChunkBoundary, Classification, Utf8Classifier};
pub use config::{CliOverrides, ScanRequest};
pub use errors::{Result, ScanError};
pub use matcher::SubstringMatcher;
pub use progress::{EventLog, NoReveal, NoopObserver, RevealAction, ScanEvent, ScanObserver};
pub use results::{FileOutcome, ScanResult, ScanSummary};
pub use scan::{scan, scan_with_reveal};
pub use walker::{count_files, FileTask, TreeWalker, WalkEvent};
