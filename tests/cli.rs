// Copyright 2024 The json-match Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![cfg(feature = "binary")]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn json_match() -> Command {
    Command::cargo_bin("json-match").unwrap()
}

#[test]
fn test_match_exits_successfully() {
    let dir = TempDir::new().unwrap();
    let pattern = write(&dir, "pattern.json", r#"{ "id": "...", "tags": [1, 2, "..."] }"#);
    let actual = write(&dir, "actual.json", r#"{ "id": 42, "tags": [1, 2, 3, 4] }"#);

    json_match()
        .arg(&pattern)
        .arg(&actual)
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON matches pattern"));
}

#[test]
fn test_mismatch_reports_every_divergence() {
    let dir = TempDir::new().unwrap();
    let pattern = write(&dir, "pattern.json", r#"{ "a": 1 }"#);
    let actual = write(&dir, "actual.json", r#"{ "b": 1 }"#);

    json_match()
        .arg(&pattern)
        .arg(&actual)
        .args(["--reason", "Body: "])
        .assert()
        .code(4)
        .stderr(predicate::str::starts_with("Body: JSON does not match pattern (2 divergences):"))
        .stderr(predicate::str::contains("Missing property $.a"))
        .stderr(predicate::str::contains("Unexpected property $.b"));
}

#[test]
fn test_any_order_flag() {
    let dir = TempDir::new().unwrap();
    let pattern = write(&dir, "pattern.json", "[1, 2]");
    let actual = write(&dir, "actual.json", "[2, 1]");

    json_match().arg(&pattern).arg(&actual).assert().code(4);
    json_match()
        .arg(&pattern)
        .arg(&actual)
        .arg("--any-order")
        .assert()
        .success();
}

#[test]
fn test_variables_flag() {
    let dir = TempDir::new().unwrap();
    let pattern = write(&dir, "pattern.json", r#"{ "greeting": "Hello {{name}}" }"#);
    let actual = write(&dir, "actual.json", r#"{ "greeting": "Hello World" }"#);

    json_match()
        .arg(&pattern)
        .arg(&actual)
        .args(["--variables", r#"{"name": "World"}"#])
        .assert()
        .success();

    json_match()
        .arg(&pattern)
        .arg(&actual)
        .args(["--variables", r#"{"name": "Mars"}"#])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("name = \"Mars\""));

    json_match()
        .arg(&pattern)
        .arg(&actual)
        .args(["--variables", "[1]"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_json_is_not_a_mismatch() {
    let dir = TempDir::new().unwrap();
    let pattern = write(&dir, "pattern.json", "{ \"a\": ");
    let actual = write(&dir, "actual.json", "{}");

    json_match()
        .arg(&pattern)
        .arg(&actual)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to parse pattern as JSON"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let actual = write(&dir, "actual.json", "{}");

    json_match()
        .arg(dir.path().join("nope.json"))
        .arg(&actual)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read"));
}

#[cfg(feature = "predicate-adapter")]
#[test]
fn test_pattern_as_output_predicate() {
    let dir = TempDir::new().unwrap();
    let pattern = write(&dir, "pattern.json", "{}");

    Command::new("cat")
        .arg(&pattern)
        .assert()
        .success()
        .stdout(json_match::JsonPattern::new(r#"{ "...": "..." }"#));
}
