use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use textscout::{FileOutcome, ScanEvent, ScanObserver, ScanSummary};

/// How progress is shown while a scan runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// One line per scanned file
    Lines,
    /// A single progress bar
    Bar,
    /// Nothing but warnings
    Quiet,
}

/// Prints scan events; runs on the thread that started the scan
pub struct ConsoleReporter {
    mode: ProgressMode,
    bar: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(mode: ProgressMode) -> Self {
        let bar = (mode == ProgressMode::Bar).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        Self { mode, bar }
    }

    fn notice(&self, message: String) {
        match &self.bar {
            Some(bar) => bar.println(message),
            None => eprintln!("{}", message),
        }
    }

    fn set_total(&self, total: usize) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
            {
                bar.set_style(style.progress_chars("=>-"));
            }
        }
    }

    /// Clears the progress bar before the summary is printed
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Formats the per-file progress line
pub fn progress_line(index: usize, total: Option<usize>, path: &std::path::Path, outcome: &FileOutcome) -> String {
    let counter = match total {
        Some(total) => format!("{}/{}", index, total),
        None => index.to_string(),
    };
    let status = match outcome {
        FileOutcome::Matched => outcome.to_string().green().to_string(),
        FileOutcome::NotMatched => outcome.to_string(),
        FileOutcome::Error(_) => outcome.to_string().red().to_string(),
    };
    format!("Scanned {}: {} | Status: {}", counter, path.display(), status)
}

impl ScanObserver for ConsoleReporter {
    fn on_event(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::Counted { total } => {
                self.set_total(*total);
                if self.mode == ProgressMode::Lines {
                    println!("Total files to scan: {}", total);
                }
            }
            ScanEvent::CountFailed { reason } => {
                self.notice(format!(
                    "{} {}. Scanning without a total...",
                    "Could not count files:".yellow(),
                    reason
                ));
            }
            ScanEvent::FileScanned {
                index,
                total,
                path,
                outcome,
            } => match self.mode {
                ProgressMode::Lines => println!("{}", progress_line(*index, *total, path, outcome)),
                ProgressMode::Bar => {
                    if let Some(bar) = &self.bar {
                        bar.inc(1);
                        if outcome.is_match() {
                            bar.println(format!("{} {}", "Found:".green(), path.display()));
                        }
                    }
                }
                ProgressMode::Quiet => {}
            },
            ScanEvent::DirectoryDenied { path, reason } => {
                self.notice(format!(
                    "{} {} ({})",
                    "Access denied:".yellow(),
                    path.display(),
                    reason
                ));
            }
            ScanEvent::RevealFailed { path, reason } => {
                self.notice(format!(
                    "{} {} ({})",
                    "Could not reveal:".yellow(),
                    path.display(),
                    reason
                ));
            }
        }
    }
}

/// Writes the human readable summary
pub fn write_summary<W: Write>(out: &mut W, summary: &ScanSummary) -> io::Result<()> {
    // Sub-millisecond precision is noise in the summary
    let elapsed = Duration::from_millis(summary.elapsed.as_millis() as u64);

    writeln!(out)?;
    writeln!(out, "Total files scanned: {}", summary.files_scanned)?;
    writeln!(out, "Total files found: {}", summary.files_matched)?;
    if summary.errors > 0 {
        writeln!(out, "Files with errors: {}", summary.errors)?;
    }
    writeln!(out, "Elapsed: {}", humantime::format_duration(elapsed))?;

    if !summary.inaccessible_dirs.is_empty() {
        writeln!(out, "\nInaccessible directories:")?;
        for dir in &summary.inaccessible_dirs {
            writeln!(out, "{}", dir.display())?;
        }
    }

    if summary.matched_paths.is_empty() {
        writeln!(out, "\nNo files found containing the search term.")?;
    } else {
        writeln!(out, "\nFound files:")?;
        for path in &summary.matched_paths {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_progress_line_format() {
        colored::control::set_override(false);
        let path = Path::new("docs/a.txt");

        assert_eq!(
            progress_line(3, Some(10), path, &FileOutcome::Matched),
            "Scanned 3/10: docs/a.txt | Status: Found"
        );
        assert_eq!(
            progress_line(4, None, path, &FileOutcome::NotMatched),
            "Scanned 4: docs/a.txt | Status: Not Found"
        );
        assert_eq!(
            progress_line(5, None, path, &FileOutcome::Error("denied".into())),
            "Scanned 5: docs/a.txt | Status: Error (denied)"
        );
    }

    #[test]
    fn test_summary_with_matches() {
        let summary = ScanSummary {
            files_scanned: 3,
            files_matched: 1,
            matched_paths: vec![PathBuf::from("a.txt")],
            elapsed: Duration::from_millis(1500),
            ..Default::default()
        };
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total files scanned: 3"));
        assert!(text.contains("Total files found: 1"));
        assert!(text.contains("Elapsed: 1s 500ms"));
        assert!(text.contains("Found files:\na.txt"));
        assert!(!text.contains("errors"));
    }

    #[test]
    fn test_summary_without_matches() {
        let summary = ScanSummary {
            inaccessible_dirs: vec![PathBuf::from("locked")],
            errors: 2,
            ..Default::default()
        };
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Files with errors: 2"));
        assert!(text.contains("Inaccessible directories:\nlocked"));
        assert!(text.contains("No files found containing the search term."));
    }
}
