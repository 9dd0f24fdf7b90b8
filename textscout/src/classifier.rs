//! UTF-8 sniffing for files of arbitrary size.
//!
//! Files are read in fixed chunks of [`CHUNK_SIZE`] bytes and every chunk is
//! validated on its own. With [`ChunkBoundary::Strict`] a multi-byte sequence
//! cut in half by a chunk boundary makes the file binary; this is the
//! historical behaviour and stays the default. [`ChunkBoundary::CarryOver`]
//! keeps the incomplete tail and validates it together with the next chunk.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

use crate::metrics::ScanMetrics;

/// Size of each block read from disk during classification
pub const CHUNK_SIZE: usize = 1024;

/// Outcome of sniffing a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    IsText,
    IsBinary,
    ReadError(String),
}

impl Classification {
    pub fn is_text(&self) -> bool {
        matches!(self, Classification::IsText)
    }
}

/// How sequences split across a chunk boundary are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkBoundary {
    /// Every chunk must be valid on its own
    #[default]
    Strict,
    /// Incomplete trailing sequences are completed by the next chunk
    CarryOver,
}

/// Result of validating one buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    Valid,
    Invalid,
    /// Valid up to the given offset, where a multi-byte sequence starts
    /// whose remaining bytes lie past the end of the buffer
    Incomplete(usize),
}

/// Number of bytes in the sequence introduced by `lead`, or `None` for a
/// byte that cannot start a sequence.
fn sequence_len(lead: u8) -> Option<usize> {
    if lead <= 0x7F {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

fn validate_chunk(bytes: &[u8]) -> ChunkState {
    let mut i = 0;
    while i < bytes.len() {
        let Some(len) = sequence_len(bytes[i]) else {
            return ChunkState::Invalid;
        };
        let end = i + len;
        let available = &bytes[i + 1..end.min(bytes.len())];
        if !available.iter().all(|&b| is_continuation(b)) {
            return ChunkState::Invalid;
        }
        if end > bytes.len() {
            return ChunkState::Incomplete(i);
        }
        i = end;
    }
    ChunkState::Valid
}

/// Checks that `bytes` is a sequence of UTF-8 shaped code points.
///
/// Only the lead/continuation bit patterns are checked: overlong encodings
/// and surrogate code points pass. A sequence that runs past the end of the
/// slice is invalid. The empty slice is valid.
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    validate_chunk(bytes) == ChunkState::Valid
}

/// Reads until `buf` is full or the reader is exhausted, so chunk boundaries
/// always fall on multiples of the buffer length.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Decides whether a file holds UTF-8 text
#[derive(Debug, Clone)]
pub struct Utf8Classifier {
    boundary: ChunkBoundary,
    metrics: Arc<ScanMetrics>,
}

impl Utf8Classifier {
    pub fn new(boundary: ChunkBoundary) -> Self {
        Self::with_metrics(boundary, Arc::new(ScanMetrics::new()))
    }

    /// Creates a classifier that records bytes read and outcomes into `metrics`
    pub fn with_metrics(boundary: ChunkBoundary, metrics: Arc<ScanMetrics>) -> Self {
        Self { boundary, metrics }
    }

    /// Classifies the file at `path`. I/O failures are reported as
    /// `ReadError` and never as text.
    pub fn classify(&self, path: &Path) -> Classification {
        let outcome = match File::open(path).and_then(|file| self.classify_reader(file)) {
            Ok(true) => Classification::IsText,
            Ok(false) => Classification::IsBinary,
            Err(e) => Classification::ReadError(e.to_string()),
        };
        trace!("Classified {}: {:?}", path.display(), outcome);
        self.metrics.record_classification(&outcome);
        outcome
    }

    /// Runs the chunked validation over any reader
    pub fn classify_reader<R: Read>(&self, mut reader: R) -> io::Result<bool> {
        let mut chunk = [0u8; CHUNK_SIZE];
        match self.boundary {
            ChunkBoundary::Strict => loop {
                let n = fill_chunk(&mut reader, &mut chunk)?;
                if n == 0 {
                    return Ok(true);
                }
                self.metrics.record_bytes(n as u64);
                if !is_valid_utf8(&chunk[..n]) {
                    return Ok(false);
                }
            },
            ChunkBoundary::CarryOver => {
                let mut window: Vec<u8> = Vec::with_capacity(CHUNK_SIZE + 3);
                loop {
                    let n = fill_chunk(&mut reader, &mut chunk)?;
                    if n == 0 {
                        // Leftover bytes at EOF are a truncated sequence
                        return Ok(window.is_empty());
                    }
                    self.metrics.record_bytes(n as u64);
                    window.extend_from_slice(&chunk[..n]);
                    match validate_chunk(&window) {
                        ChunkState::Valid => window.clear(),
                        ChunkState::Invalid => return Ok(false),
                        ChunkState::Incomplete(start) => {
                            window.drain(..start);
                        }
                    }
                }
            }
        }
    }
}

impl Default for Utf8Classifier {
    fn default() -> Self {
        Self::new(ChunkBoundary::Strict)
    }
}

/// Fail-closed convenience wrapper using the strict boundary policy
pub fn is_utf8_file(path: &Path) -> bool {
    Utf8Classifier::default().classify(path).is_text()
}
