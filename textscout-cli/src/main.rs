mod prompt;
mod reporter;
mod reveal;

use clap::Parser;
use colored::Colorize;
use std::env;
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use textscout::{scan_with_reveal, CliOverrides, NoReveal, RevealAction, ScanError, ScanRequest};
use tracing_subscriber::EnvFilter;

use prompt::Prompter;
use reporter::{write_summary, ConsoleReporter, ProgressMode};
use reveal::ShellReveal;

type Result<T> = std::result::Result<T, ScanError>;

/// Find UTF-8 text files containing a string.
///
/// When no search term is configured, the remaining settings are asked for
/// interactively.
#[derive(Parser, Debug)]
#[command(name = "textscout", author, version, about, long_about = None)]
struct Cli {
    /// Root directory to scan
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Text to search for
    #[arg(short = 't', long)]
    term: Option<String>,

    /// Count files before scanning to show progress against a total
    #[arg(short = 'c', long)]
    count: bool,

    /// Match case exactly
    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// Reveal every matched file in the file manager
    #[arg(short = 'o', long)]
    reveal: bool,

    /// Number of threads to use
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Files or directories to skip (glob format)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Accept multi-byte characters split across classification chunks
    #[arg(long)]
    utf8_carry_over: bool,

    /// Configuration file layered over the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Show a progress bar instead of one line per file
    #[arg(long)]
    progress_bar: bool,

    /// Print the summary as JSON and suppress progress output
    #[arg(long)]
    json: bool,

    /// Never prompt; fail if required values are missing
    #[arg(long)]
    no_prompt: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_path: self.root.clone(),
            search_term: self.term.clone(),
            case_sensitive: self.case_sensitive.then_some(true),
            count_files_first: self.count.then_some(true),
            reveal_matches: self.reveal.then_some(true),
            thread_count: self.threads,
            ignore_patterns: self.ignore.clone(),
            utf8_carry_over: self.utf8_carry_over,
            log_level: self.log_level.clone(),
        }
    }

    fn progress_mode(&self) -> ProgressMode {
        if self.json {
            ProgressMode::Quiet
        } else if self.progress_bar {
            ProgressMode::Bar
        } else {
            ProgressMode::Lines
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// The unconfigured root `.` is offered as the absolute working directory
fn default_root(root: &Path) -> PathBuf {
    if root == Path::new(".") {
        env::current_dir().unwrap_or_else(|_| root.to_path_buf())
    } else {
        root.to_path_buf()
    }
}

/// Asks for everything the command line left open, offering the configured
/// values as defaults
fn complete_interactively<R: BufRead, W: Write>(
    cli: &Cli,
    mut request: ScanRequest,
    prompter: &mut Prompter<R, W>,
) -> io::Result<ScanRequest> {
    if cli.root.is_none() {
        let default = default_root(&request.root_path).display().to_string();
        let root = prompter.ask_text("Enter the folder to search", Some(&default))?;
        request.root_path = PathBuf::from(root);
    }
    if cli.term.is_none() {
        let default = request.search_term.clone();
        request.search_term =
            prompter.ask_text("Enter the string to search for", Some(&default))?;
    }
    if !cli.count {
        request.count_files_first =
            prompter.ask_yes_no("Count files before scanning?", request.count_files_first)?;
    }
    if !cli.case_sensitive {
        request.case_sensitive =
            prompter.ask_yes_no("Case-sensitive search?", request.case_sensitive)?;
    }
    if !cli.reveal {
        request.reveal_matches =
            prompter.ask_yes_no("Open found files in the file manager?", request.reveal_matches)?;
    }
    Ok(request)
}

fn run(cli: Cli) -> Result<()> {
    let mut request = ScanRequest::load_from(cli.config.as_deref())?.merge_with_cli(cli.overrides());
    init_logging(&request.log_level);

    if request.search_term.is_empty() && !cli.no_prompt {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        request = complete_interactively(&cli, request, &mut prompter)?;
    }
    request.validate()?;

    let mode = cli.progress_mode();
    if mode == ProgressMode::Lines && !request.count_files_first {
        println!("Skipping file count. Scanning directly...");
    }

    let reveal: &dyn RevealAction = if request.reveal_matches {
        &ShellReveal
    } else {
        &NoReveal
    };
    let mut reporter = ConsoleReporter::new(mode);
    let summary = scan_with_reveal(&request, &mut reporter, reveal);
    reporter.finish();
    let summary = summary?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| ScanError::config_error(format!("failed to encode summary: {}", e)))?;
        writeln!(out, "{}", json)?;
    } else {
        write_summary(&mut out, &summary)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
