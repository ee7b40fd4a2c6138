//! Drives the `muter` binary against small projects on disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const APP: &str = "def positive(x):\n    return x > 0\n";

fn muter(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_muter"))
        .args(args)
        .current_dir(cwd)
        .env_remove("MUTER_PROJECT")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run muter")
}

/// A Python project whose "test suite" checks the source text.
fn project(test_script: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.py"), APP).unwrap();
    let configuration = serde_json::json!({
        "executable": "sh",
        "arguments": ["-c", test_script],
        "excludeList": [],
    });
    fs::write(
        dir.path().join("muter.conf.json"),
        serde_json::to_string_pretty(&configuration).unwrap(),
    )
    .unwrap();
    dir
}

fn read_report(dir: &TempDir) -> serde_json::Value {
    let json = fs::read_to_string(dir.path().join("muter-report.json")).expect("report written");
    serde_json::from_str(&json).unwrap()
}

#[test]
fn killed_mutant_scores_one_hundred() {
    let dir = project("grep -q 'return x > 0' app.py");

    let output = muter(&["run", "--output-json"], dir.path());

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report = read_report(&dir);
    assert_eq!(report["globalMutationScore"], 100);
    assert_eq!(report["totalAppliedMutationOperators"], 1);
    assert_eq!(report["fileReports"][0]["fileName"], "app.py");
    assert_eq!(report["fileReports"][0]["appliedOperators"][0]["testSuiteOutcome"], "failed");

    // The project itself is never mutated.
    assert_eq!(fs::read_to_string(dir.path().join("app.py")).unwrap(), APP);
    assert!(dir.path().join("muter_logs").is_dir());
}

#[test]
fn surviving_mutant_is_reported_for_ides() {
    let dir = project("exit 0");

    let output = muter(&["run", "--output-xcode"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let warning = concat!(
        ":2:14: warning: ",
        "\"Your test suite did not kill this mutant: Changed negateConditionals\""
    );
    assert!(stdout.contains(warning), "{stdout}");
    assert!(stdout.contains("app.py"));
    assert!(!dir.path().join("muter-report.json").exists());
}

#[test]
fn text_report_is_the_default() {
    let dir = project("exit 0");

    let output = muter(&["run"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Muter finished running!"));
    assert!(stdout.contains("Mutation Score of Test Suite (higher is better): 0/100"));
}

#[test]
fn run_finds_the_project_from_a_subdirectory() {
    let dir = project("grep -q 'return x > 0' app.py");
    let nested = dir.path().join("docs");
    fs::create_dir(&nested).unwrap();

    let output = muter(&["run", "--output-json"], &nested);

    assert!(output.status.success());
    assert_eq!(read_report(&dir)["globalMutationScore"], 100);
}

#[test]
fn failing_baseline_aborts_without_a_score() {
    let dir = project("exit 1");

    let output = muter(&["run", "--output-json"], dir.path());

    assert!(output.status.success());
    let report = read_report(&dir);
    assert_eq!(report["globalMutationScore"], -1);
    assert_eq!(report["totalAppliedMutationOperators"], 0);
}

#[test]
fn missing_configuration_exits_with_code_two() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.py"), APP).unwrap();

    let output = muter(&["run", "--project", dir.path().to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("muter_logs").exists());
}

#[test]
fn init_writes_configuration_once() {
    let dir = TempDir::new().unwrap();

    let first = muter(&["init"], dir.path());
    assert!(first.status.success());
    let written = fs::read_to_string(dir.path().join("muter.conf.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["executable"], "absolute path to the executable that runs your tests");

    let second = muter(&["init"], dir.path());
    assert_eq!(second.status.code(), Some(2));

    let forced = muter(&["init", "--force"], dir.path());
    assert!(forced.status.success());
}
