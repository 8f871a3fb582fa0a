//! CLI integration tests.
//!
//! Runs the `jsonscan` binary against temporary files and standard input.
#![allow(deprecated)] // cargo_bin is deprecated but still supported by assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn json_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn jsonscan() -> Command {
    Command::cargo_bin("jsonscan").expect("cargo bin")
}

#[test]
fn valid_document_exits_zero() {
    let file = json_file(r#"{"a":[1,2,{"b":true}]}"#);
    jsonscan()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("valid JSON (object)"));
}

#[test]
fn invalid_document_exits_one_with_position() {
    let file = json_file("[1,2,]");
    jsonscan()
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Unexpected ']', expected a value at line 1, column 6.",
        ));
}

#[test]
fn quiet_prints_nothing() {
    let file = json_file("[1,");
    jsonscan()
        .arg("--quiet")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn missing_file_exits_two() {
    jsonscan()
        .arg("/definitely/not/here.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Could not open"));
}

#[test]
fn reads_standard_input() {
    jsonscan()
        .arg("-")
        .write_stdin("  null \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid JSON (null)"));
}

#[test]
fn token_dump_matches_scanner_format() {
    let file = json_file("{\"k\": true}");
    jsonscan()
        .arg("--tokens")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            "Token: TOKEN_LEFT_BRACE\n\
             Token: TOKEN_STRING\n\
             Token: TOKEN_COLON\n\
             Token: TOKEN_WHITESPACE\n\
             Token: TOKEN_TRUE\n\
             Token: TOKEN_RIGHT_BRACE\n\
             End of file\n",
        );
}

#[test]
fn token_dump_stops_at_lexer_error() {
    let file = json_file("[1, @oops]");
    jsonscan()
        .arg("--tokens")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(predicate::str::ends_with("Error, quitting\n"))
        .stderr(predicate::str::contains("Unexpected character '@' near \"oops]\""));
}

#[test]
fn legacy_flag_relaxes_numbers() {
    let file = json_file("[1.2.3]");
    jsonscan().arg(file.path()).assert().code(1);
    jsonscan().arg("--legacy").arg(file.path()).assert().success();
}

#[test]
fn max_depth_flag() {
    let file = json_file("[[[]]]");
    jsonscan()
        .args(["--max-depth", "2"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Maximum nesting depth of 2 exceeded"));
    jsonscan().args(["--max-depth", "3"]).arg(file.path()).assert().success();
}

#[test]
fn quiet_token_dump_keeps_tokens_but_drops_diagnostic() {
    let file = json_file("[@]");
    jsonscan()
        .args(["--tokens", "--quiet"])
        .arg(file.path())
        .assert()
        .code(1)
        .stdout("Token: TOKEN_LEFT_BRACKET\nError, quitting\n")
        .stderr(predicate::str::is_empty());
}
