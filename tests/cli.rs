//! Runs the built binary: report on stdout, logs on stderr.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SAMPLE_REPORT: &str = "\
Symbol: ABC Max Price: 70 Min Price: 50 Average Price: 62 Total Volume: 450
Symbol: XYZ Max Price: 80 Min Price: 75 Average Price: 77 Total Volume: 450
";

fn tradestats(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tradestats"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("TRADESTATS_INPUT_PATH")
        .env_remove("TRADESTATS_ON_MALFORMED")
        .env_remove("TRADESTATS_LOG_FILTER")
        .output()
        .unwrap()
}

#[test]
fn test_default_input_file() {
    let output = tradestats(Path::new(env!("CARGO_MANIFEST_DIR")), &["--log", "off"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), SAMPLE_REPORT);
}

#[test]
fn test_report_on_stdout_logs_on_stderr() {
    let dir = TempDir::new().unwrap();
    fs::copy(Path::new(env!("CARGO_MANIFEST_DIR")).join("input_data.csv"), dir.path().join("day.csv"))
        .unwrap();

    let output = tradestats(dir.path(), &["day.csv", "--log", "info"]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(output.status.success(), "{}", stderr);
    assert_eq!(stdout, SAMPLE_REPORT);
    assert!(stderr.contains("Run complete"), "{}", stderr);
    assert!(!stderr.contains("Symbol:"), "{}", stderr);
}

#[test]
fn test_missing_input_exits_non_zero() {
    let dir = TempDir::new().unwrap();

    let output = tradestats(dir.path(), &["missing.csv", "--log", "off"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr).unwrap().contains("missing.csv"));
}
