use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn create_test_files(files: &[(&str, &[u8])]) -> Result<TempDir> {
    let dir = tempdir()?;
    for (name, content) in files {
        fs::write(dir.path().join(name), content)?;
    }
    Ok(dir)
}

fn textscout() -> Result<Command> {
    let mut cmd = Command::cargo_bin("textscout")?;
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_case_sensitive_search() -> Result<()> {
    let dir = create_test_files(&[
        ("a.txt", b"Hello World"),
        ("b.bin", &[0xFF, 0xFE]),
        ("c.txt", b"hello world"),
    ])?;

    textscout()?
        .args(["--no-prompt", "-s", "-t", "Hello", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping file count. Scanning directly..."))
        .stdout(predicate::str::contains("Total files scanned: 3"))
        .stdout(predicate::str::contains("Total files found: 1"))
        .stdout(predicate::str::contains("a.txt | Status: Found"))
        .stdout(predicate::str::contains("c.txt | Status: Not Found"));
    Ok(())
}

#[test]
fn test_count_first_shows_totals() -> Result<()> {
    let dir = create_test_files(&[("a.txt", b"Hello World"), ("c.txt", b"hello world")])?;

    textscout()?
        .args(["--no-prompt", "-c", "-t", "hello", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total files to scan: 2"))
        .stdout(predicate::str::contains("/2: "))
        .stdout(predicate::str::contains("Total files found: 2"));
    Ok(())
}

#[test]
fn test_interactive_prompts() -> Result<()> {
    let dir = create_test_files(&[("notes.txt", b"remember the needle")])?;
    let answers = format!("{}\nneedle\nno\nno\nno\n", dir.path().display());

    textscout()?
        .write_stdin(answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter the folder to search"))
        .stdout(predicate::str::contains("Enter the string to search for: "))
        .stdout(predicate::str::contains("Count files before scanning? (yes/no) [no]: "))
        .stdout(predicate::str::contains("Total files found: 1"))
        .stdout(predicate::str::contains("notes.txt"));
    Ok(())
}

#[test]
fn test_no_matches_message() -> Result<()> {
    let dir = create_test_files(&[("a.txt", b"nothing to see")])?;

    textscout()?
        .args(["--no-prompt", "-t", "absent", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found containing the search term."));
    Ok(())
}

#[test]
fn test_json_summary() -> Result<()> {
    let dir = create_test_files(&[("a.txt", b"Hello World"), ("b.txt", b"bye")])?;

    let output = textscout()?
        .args(["--no-prompt", "--json", "-t", "hello", "-d"])
        .arg(dir.path())
        .output()?;
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(summary["files_scanned"], 2);
    assert_eq!(summary["files_matched"], 1);
    assert_eq!(summary["matched_paths"].as_array().map(|a| a.len()), Some(1));
    Ok(())
}

#[test]
fn test_invalid_root() -> Result<()> {
    let dir = tempdir()?;

    textscout()?
        .args(["--no-prompt", "-t", "x", "-d"])
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid root directory"));
    Ok(())
}

#[test]
fn test_empty_search_term() -> Result<()> {
    let dir = tempdir()?;

    textscout()?
        .args(["--no-prompt", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search term must not be empty"));
    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let dir = create_test_files(&[("a.txt", b"Needle"), ("b.txt", b"needle")])?;
    let config = dir.path().join("scan.yaml");
    fs::write(
        &config,
        format!(
            "root_path: \"{}\"\nsearch_term: \"Needle\"\ncase_sensitive: true\nignore_patterns: [\"*.yaml\"]\n",
            dir.path().display()
        ),
    )?;

    textscout()?
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total files scanned: 2"))
        .stdout(predicate::str::contains("Total files found: 1"));
    Ok(())
}
