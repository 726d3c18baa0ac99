use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

fn charter_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("charter").unwrap();
    cmd.env("CHARTER_OUTPUT_DIR", dir);
    cmd.env("CHARTER_INCLUDE_TIMESTAMP", "false");
    cmd.env("CHARTER_INCLUDE_RANDOM_SUFFIX", "false");
    cmd
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("charter").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("charter"));
}

#[test]
fn list_names_themes_styles_and_formats() {
    let mut cmd = Command::cargo_bin("charter").unwrap();
    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("plotly_dark"))
        .stdout(predicate::str::contains("stacked"))
        .stdout(predicate::str::contains("donut"))
        .stdout(predicate::str::contains("pdf"));
}

#[test]
fn bar_with_inline_json_writes_a_file() {
    let dir = tempdir().unwrap();
    let mut cmd = charter_cmd(dir.path());
    cmd.args([
        "bar",
        "--data",
        r#"{"labels": ["a", "b"], "values": [1.0, 2.0]}"#,
        "--format",
        "svg",
        "--title",
        "Demo",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bar.svg"));
    assert!(dir.path().join("bar.svg").exists());
}

#[test]
fn data_can_come_from_a_file() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("input.json");
    std::fs::write(
        &data_file,
        r#"{"labels": ["a", "b"], "values": [60.0, 40.0]}"#,
    )
    .unwrap();
    let mut cmd = charter_cmd(dir.path());
    cmd.args([
        "pie",
        "--data",
        &format!("@{}", data_file.display()),
        "--style",
        "donut",
        "--format",
        "svg",
    ]);
    cmd.assert().success();
    assert!(dir.path().join("pie.svg").exists());
}

#[test]
fn malformed_json_fails_with_a_message() {
    let dir = tempdir().unwrap();
    let mut cmd = charter_cmd(dir.path());
    cmd.args(["bar", "--data", "{not json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("JSON"));
}

#[test]
fn invalid_chart_data_names_the_offending_field() {
    let dir = tempdir().unwrap();
    let mut cmd = charter_cmd(dir.path());
    cmd.args(["pie", "--data", r#"{"labels": ["a"], "values": [-1.0]}"#]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("values"));
}

#[test]
fn unknown_style_lists_the_alternatives() {
    let dir = tempdir().unwrap();
    let mut cmd = charter_cmd(dir.path());
    cmd.args([
        "line",
        "--data",
        r#"{"x": [0.0, 1.0], "y": [1.0, 2.0]}"#,
        "--style",
        "zigzag",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("smooth"));
}

#[test]
fn gallery_writes_into_its_own_subdirectory() {
    let dir = tempdir().unwrap();
    let mut cmd = charter_cmd(dir.path());
    cmd.args(["gallery", "--chart", "rose", "--format", "svg"]);
    cmd.assert().success();
    let gallery = dir.path().join("gallery");
    assert!(gallery.is_dir());
    let files: Vec<_> = std::fs::read_dir(&gallery)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(!files.is_empty());
    assert!(files.iter().all(|f| f.starts_with("gallery_rose_") && f.ends_with(".svg")));
    // nothing lands directly in the output root
    let root_files = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().is_file())
        .count();
    assert_eq!(root_files, 0);
}
