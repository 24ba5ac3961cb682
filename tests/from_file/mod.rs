//! E2E test running the actual binary against fixture files.

use std::path::PathBuf;
use std::process::Command;

#[test]
fn binary_reports_totals_for_the_fixture_upload() {
    let output = Command::new(env!("CARGO_BIN_EXE_meter-ingest-rs"))
        .arg(fixture_path("accounts.csv"))
        .arg(fixture_path("readings.csv"))
        .output()
        .expect("failed to execute binary");

    assert!(
        output.status.success(),
        "binary exited with non-zero status.\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("binary output was not valid UTF-8");
    // 7 rows: three accepted; one duplicate, one unknown account,
    // one bad date, one bad value.
    assert_eq!(stdout.trim(), "3 succeeded, 4 failed");
}

#[test]
fn binary_fails_usefully_without_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_meter-ingest-rs"))
        .output()
        .expect("failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr was: {stderr}");
}

/// Returns the absolute path to a test fixture file in `tests/data/`.
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}
