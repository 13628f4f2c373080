use assert_cmd::Command;
use predicates::prelude::*;

fn fol_cmd() -> Command {
    Command::cargo_bin("fol").unwrap()
}

#[test]
fn test_text_output() {
    fol_cmd()
        .arg("forall x, y,   z. R(x, w, z)")
        .assert()
        .success()
        .stdout("forall x, y, z. R(x, w, z)\n");
}

#[test]
fn test_json_output() {
    fol_cmd()
        .args(["--format", "json", "a and b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"conjunction\""))
        .stdout(predicate::str::contains("\"name\": \"b\""));
}

#[test]
fn test_reads_stdin_lines() {
    fol_cmd()
        .write_stdin("a => b\n\n  T or x  \n")
        .assert()
        .success()
        .stdout("a => b\ntrue or x\n");
}

#[test]
fn test_failure_exits_with_status_1() {
    fol_cmd()
        .args(["a", "R()"])
        .assert()
        .code(1)
        .stdout("a\n")
        .stderr(predicate::str::contains(
            "All of the following parsers have failed:",
        ));
}

#[test]
fn test_missing_config_file() {
    fol_cmd()
        .args(["--config", "does-not-exist.json", "a"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open config file"));
}
