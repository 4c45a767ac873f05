use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const SPEC: &str = r##"{
    "plots": {
        "growth": {"y": [1, 2, 4], "title": "Growth"},
        "alpha": {"y": [3, 1], "y_kwargs": {"color": "#ffffff"}}
    },
    "common": {"xlabel": "year", "merge": {"y_kwargs": {"color": "black", "linewidth": 2}}},
    "subplots": {"n_columns": 2}
}"##;

fn spec_file() -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    fs::write(file.path(), SPEC).unwrap();
    file
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("toolplot").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("toolplot"));
}

#[test]
fn inspect_prints_merged_panels_in_document_order() {
    let spec = spec_file();
    let mut cmd = Command::cargo_bin("toolplot").unwrap();
    cmd.arg("inspect").arg(spec.path());
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();

    let growth = text.find("\"growth\"").unwrap();
    let alpha = text.find("\"alpha\"").unwrap();
    assert!(growth < alpha);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["growth"]["xlabel"], "year");
    assert_eq!(value["alpha"]["y_kwargs"]["color"], "#FFFFFF");
    assert_eq!(value["alpha"]["y_kwargs"]["linewidth"], 2.0);
}

#[test]
fn inspect_calls_lists_grid_positions() {
    let spec = spec_file();
    let mut cmd = Command::cargo_bin("toolplot").unwrap();
    cmd.args(["inspect", "--calls"]).arg(spec.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1x2 grid"))
        .stdout(predicate::str::contains("[alpha] row 0 col 1"));
}

#[test]
fn render_without_outputs_fails() {
    let spec = spec_file();
    let mut cmd = Command::cargo_bin("toolplot").unwrap();
    cmd.arg("render").arg(spec.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("nothing to write"));
}

#[test]
fn invalid_name_position_is_reported() {
    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    fs::write(
        file.path(),
        r#"{"plots": {"a": {"name": "n", "name_position": "footer"}}}"#,
    )
    .unwrap();
    let mut cmd = Command::cargo_bin("toolplot").unwrap();
    cmd.arg("inspect").arg(file.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown position for name: footer"));
}
