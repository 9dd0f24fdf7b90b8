use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::classifier::ChunkBoundary;
use crate::errors::{Result, ScanError};

/// Parameters of a single scan.
///
/// # Configuration Locations
///
/// Values can be loaded from several files, later ones overriding earlier
/// ones:
/// 1. Global `$CONFIG_DIR/textscout/config.yaml`
/// 2. Local `.textscout.yaml` in the current directory
/// 3. A file given with `--config`
///
/// ```yaml
/// root_path: "~/notes"
/// search_term: "invoice"
/// case_sensitive: false
/// count_files_first: true
/// reveal_matches: false
/// thread_count: 8
/// ignore_patterns: [".git", "node_modules"]
/// utf8_carry_over: false
/// log_level: "warn"
/// ```
///
/// Command line arguments take precedence, see [`ScanRequest::merge_with_cli`].
/// The driver only ever reads a request; run [`ScanRequest::validate`] before
/// scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Directory the scan starts from
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Literal text to look for
    #[serde(default)]
    pub search_term: String,

    /// Compare ordinally instead of case-folded
    #[serde(default)]
    pub case_sensitive: bool,

    /// Run a sequential pass first to learn the total file count
    #[serde(default)]
    pub count_files_first: bool,

    /// Invoke the reveal hook for every matched file
    #[serde(default)]
    pub reveal_matches: bool,

    /// Number of worker threads
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Glob patterns for files and directories to skip
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Validate multi-byte sequences across classification chunk boundaries
    #[serde(default)]
    pub utf8_carry_over: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

pub fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            search_term: String::new(),
            case_sensitive: false,
            count_files_first: false,
            reveal_matches: false,
            thread_count: default_thread_count(),
            ignore_patterns: Vec::new(),
            utf8_carry_over: false,
            log_level: default_log_level(),
        }
    }
}

impl ScanRequest {
    /// Creates a request with default options
    pub fn new(root_path: impl Into<PathBuf>, search_term: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            search_term: search_term.into(),
            ..Default::default()
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_count_files_first(mut self, count: bool) -> Self {
        self.count_files_first = count;
        self
    }

    pub fn with_reveal_matches(mut self, reveal: bool) -> Self {
        self.reveal_matches = reveal;
        self
    }

    pub fn with_thread_count(mut self, count: NonZeroUsize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_utf8_carry_over(mut self, carry_over: bool) -> Self {
        self.utf8_carry_over = carry_over;
        self
    }

    pub fn chunk_boundary(&self) -> ChunkBoundary {
        if self.utf8_carry_over {
            ChunkBoundary::CarryOver
        } else {
            ChunkBoundary::Strict
        }
    }

    /// Rejects requests that cannot start: a root that is not an existing
    /// directory, or an empty search term
    pub fn validate(&self) -> Result<()> {
        if !self.root_path.is_dir() {
            return Err(ScanError::invalid_root(&self.root_path));
        }
        if self.search_term.is_empty() {
            return Err(ScanError::EmptySearchTerm);
        }
        Ok(())
    }

    /// Loads configuration, layering `config_path` over the default files
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("textscout/config.yaml")),
            Some(PathBuf::from(".textscout.yaml")),
        ];
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Overlays values given on the command line
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if let Some(term) = cli.search_term {
            self.search_term = term;
        }
        if let Some(case_sensitive) = cli.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(count) = cli.count_files_first {
            self.count_files_first = count;
        }
        if let Some(reveal) = cli.reveal_matches {
            self.reveal_matches = reveal;
        }
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if cli.utf8_carry_over {
            self.utf8_carry_over = true;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }
}

/// Values explicitly given on the command line; `None` keeps the
/// configured value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub search_term: Option<String>,
    pub case_sensitive: Option<bool>,
    pub count_files_first: Option<bool>,
    pub reveal_matches: Option<bool>,
    pub thread_count: Option<NonZeroUsize>,
    pub ignore_patterns: Vec<String>,
    pub utf8_carry_over: bool,
    pub log_level: Option<String>,
}
