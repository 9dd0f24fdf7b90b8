use regex::{Regex, RegexBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{trace, warn};

use crate::errors::{Result, ScanError};

const BUFFER_CAPACITY: usize = 8192;
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Strategy for comparing a line against the search term
#[derive(Debug, Clone)]
enum MatchStrategy {
    /// Ordinal, code unit for code unit
    Exact(String),
    /// Literal pattern compiled with Unicode simple case folding
    IgnoreCase(Regex),
}

/// Line oriented substring search over text files
#[derive(Debug, Clone)]
pub struct SubstringMatcher {
    strategy: MatchStrategy,
}

impl SubstringMatcher {
    /// Creates a matcher for `term`. An empty term matches every line.
    pub fn new(term: &str, case_sensitive: bool) -> Result<Self> {
        let strategy = if case_sensitive {
            MatchStrategy::Exact(term.to_string())
        } else {
            let regex = RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .map_err(|e| ScanError::config_error(format!("unusable search term: {}", e)))?;
            MatchStrategy::IgnoreCase(regex)
        };
        Ok(Self { strategy })
    }

    pub fn is_case_sensitive(&self) -> bool {
        matches!(self.strategy, MatchStrategy::Exact(_))
    }

    /// Checks a single line
    pub fn matches_line(&self, line: &str) -> bool {
        match &self.strategy {
            MatchStrategy::Exact(term) => line.contains(term.as_str()),
            MatchStrategy::IgnoreCase(regex) => regex.is_match(line),
        }
    }

    /// Scans the file line by line and stops at the first matching line.
    ///
    /// A leading UTF-8 byte order mark is dropped. Lines are decoded lossily,
    /// which keeps files with overlong sequences searchable.
    pub fn try_matches_file(&self, path: &Path) -> Result<bool> {
        let file = File::open(path).map_err(|e| ScanError::file_read_error(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut line_buffer = Vec::with_capacity(256);
        let mut line_number = 0usize;

        loop {
            line_buffer.clear();
            let read = reader
                .read_until(b'\n', &mut line_buffer)
                .map_err(|e| ScanError::file_read_error(path, e))?;
            if read == 0 {
                return Ok(false);
            }
            line_number += 1;

            let mut bytes = line_buffer.as_slice();
            if line_number == 1 {
                bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            }
            bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
            bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);

            if self.matches_line(&String::from_utf8_lossy(bytes)) {
                trace!("Match at line {} of {}", line_number, path.display());
                return Ok(true);
            }
        }
    }

    /// Fail-soft variant: read errors count as no match
    pub fn matches_file(&self, path: &Path) -> bool {
        match self.try_matches_file(path) {
            Ok(found) => found,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_case_sensitive_line_matching() {
        let matcher = SubstringMatcher::new("Hello", true).unwrap();
        assert!(matcher.is_case_sensitive());
        assert!(matcher.matches_line("Hello World"));
        assert!(matcher.matches_line("say Hello"));
        assert!(!matcher.matches_line("hello world"));
        assert!(!matcher.matches_line("HELLO"));
    }

    #[test]
    fn test_case_insensitive_line_matching() {
        let matcher = SubstringMatcher::new("Hello", false).unwrap();
        assert!(matcher.matches_line("Hello World"));
        assert!(matcher.matches_line("hello world"));
        assert!(matcher.matches_line("xxHELLOxx"));
        assert!(!matcher.matches_line("help"));
    }

    #[test]
    fn test_case_insensitive_non_ascii() {
        let matcher = SubstringMatcher::new("ÄRGER", false).unwrap();
        assert!(matcher.matches_line("so ein ärger"));
    }

    #[test]
    fn test_term_is_literal() {
        let matcher = SubstringMatcher::new("a.c", false).unwrap();
        assert!(matcher.matches_line("xa.cx"));
        assert!(!matcher.matches_line("abc"));

        let matcher = SubstringMatcher::new("(x|y)*", false).unwrap();
        assert!(matcher.matches_line("literal (x|y)* here"));
        assert!(!matcher.matches_line("xyxy"));
    }

    #[test]
    fn test_empty_term_matches_any_line() {
        let matcher = SubstringMatcher::new("", true).unwrap();
        assert!(matcher.matches_line(""));
        assert!(matcher.matches_line("anything"));
    }

    #[test]
    fn test_matches_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "first line\r\nsecond Needle line\nthird\n").unwrap();

        assert!(SubstringMatcher::new("Needle", true).unwrap().matches_file(&path));
        assert!(SubstringMatcher::new("needle", false).unwrap().matches_file(&path));
        assert!(!SubstringMatcher::new("needle", true).unwrap().matches_file(&path));
    }

    #[test]
    fn test_term_does_not_span_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("split.txt");
        fs::write(&path, "foo\nbar\n").unwrap();

        let matcher = SubstringMatcher::new("foobar", true).unwrap();
        assert!(!matcher.matches_file(&path));
        let matcher = SubstringMatcher::new("o\nb", true).unwrap();
        assert!(!matcher.matches_file(&path));
    }

    #[test]
    fn test_bom_is_stripped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.txt");
        let mut content = UTF8_BOM.to_vec();
        content.extend_from_slice(b"start here");
        fs::write(&path, content).unwrap();

        let matcher = SubstringMatcher::new("\u{FEFF}start", true).unwrap();
        assert!(!matcher.matches_file(&path));
        let matcher = SubstringMatcher::new("start", true).unwrap();
        assert!(matcher.matches_file(&path));
    }

    #[test]
    fn test_empty_file_has_no_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let matcher = SubstringMatcher::new("", true).unwrap();
        assert!(!matcher.matches_file(&path));
    }

    #[test]
    fn test_missing_file_is_not_a_match() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let matcher = SubstringMatcher::new("x", true).unwrap();
        assert!(matches!(
            matcher.try_matches_file(&path),
            Err(ScanError::FileReadError { .. })
        ));
        assert!(!matcher.matches_file(&path));
    }
}
