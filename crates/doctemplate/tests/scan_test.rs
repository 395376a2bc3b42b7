//! Integration tests for `doctemplate scan`

use assert_cmd::Command;
use assert_cmd::cargo_bin;
use doctemplate_testkit::temp_dir_in_workspace;
use predicates::prelude::*;
use std::fs;

fn doctemplate() -> Command {
    Command::new(cargo_bin!("doctemplate"))
}

#[test]
fn test_scan_lists_placeholders() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    fs::write(root.join("_offer.txt"), "Dear !name!\n\nTotal !=price*qty! (!name!)").unwrap();

    doctemplate()
        .current_dir(root)
        .args(["scan", "_offer.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 placeholder(s)"))
        .stdout(predicate::str::contains("literal"))
        .stdout(predicate::str::contains("formula"))
        .stdout(predicate::str::contains("price*qty  (line 3)"))
        .stdout(predicate::str::contains("Enter template values:").not());
}

#[test]
fn test_scan_json() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    fs::write(root.join("_offer.txt"), "!a! !=a+1!").unwrap();

    let output = doctemplate()
        .current_dir(root)
        .args(["scan", "_offer.txt", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let placeholders = report["placeholders"].as_array().unwrap();
    assert_eq!(placeholders.len(), 2);
    assert_eq!(placeholders[0]["kind"], "literal");
    assert_eq!(placeholders[0]["expression"], "a");
    assert_eq!(placeholders[1]["kind"], "formula");
    assert_eq!(placeholders[1]["raw"], "=a+1");
    assert_eq!(placeholders[1]["expression"], "a+1");
}

#[test]
fn test_scan_without_placeholders() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    fs::write(root.join("plain.txt"), "nothing <b>here</b>").unwrap();

    doctemplate()
        .current_dir(root)
        .args(["scan", "plain.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No placeholders"));
}

#[test]
fn test_scan_missing_template() {
    let temp = temp_dir_in_workspace();

    doctemplate()
        .current_dir(temp.path())
        .args(["scan", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found"));
}
