// Regression tests for the `lrtree` binary: output formats, exit codes and
// miette diagnostics on stderr.

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{fixture, fixtures_dir};

fn lrtree() -> Command {
    let mut cmd = Command::cargo_bin("lrtree").unwrap();
    cmd.env_remove("LRTREE_LOG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn build_prints_the_outline() {
    lrtree()
        .arg("build")
        .arg(fixture("sum.trace"))
        .assert()
        .success()
        .stdout(contains("E #2 [sum.php:1]"))
        .stdout(contains("  + #1 \"+\" line 1"))
        .stdout(contains("    NUM #0 \"3\" line 2"));
}

#[test]
fn file_name_flag_overrides_the_script() {
    lrtree()
        .args(["build", "--file-name", "other.php"])
        .arg(fixture("sum.trace"))
        .assert()
        .success()
        .stdout(contains("[other.php:1]"));
}

#[test]
fn build_prints_dot() {
    lrtree()
        .args(["build", "--format", "dot"])
        .arg(fixture("nested/single.json"))
        .assert()
        .success()
        .stdout(contains("digraph parse_tree {"))
        .stdout(contains("shape=ellipse"))
        .stdout(contains(" -> n"));
}

#[test]
fn json_output_rebuilds() {
    let output = lrtree()
        .args(["build", "--format", "json"])
        .arg(fixture("sum.trace"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let dir = tempfile::tempdir().unwrap();
    let description = dir.path().join("sum.json");
    fs::write(&description, &output.stdout).unwrap();

    lrtree()
        .args(["rebuild", "--file-name", "copy.php"])
        .arg(&description)
        .assert()
        .success()
        .stdout(contains("E #2 [copy.php:1]"));
}

#[test]
fn check_passes_on_fixtures() {
    lrtree()
        .args(["check", "--color", "never"])
        .arg(fixtures_dir())
        .assert()
        .success()
        .stdout(contains("3 scripts, 3 passed, 0 failed"));
}

#[test]
fn check_fails_on_a_broken_script() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture("sum.trace"), dir.path().join("good.trace")).unwrap();
    fs::write(
        dir.path().join("bad.trace"),
        "terminal 0 NUM\nshift NUM \"1\" 1\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.md"), "not a script").unwrap();

    lrtree()
        .args(["check", "--color", "never"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(contains("FAIL"))
        .stdout(contains("2 scripts, 1 passed, 1 failed"));
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.trace");
    fs::write(&bad, "terminal 0 NUM\nshift NUM 1\n").unwrap();

    lrtree()
        .arg("build")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(contains("lrtree::input::script").or(contains("invalid trace script")));
}

#[test]
fn unsupported_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.csv");
    fs::write(&path, "accept").unwrap();

    lrtree()
        .arg("build")
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("lrtree::input::format"));
}
