//! End-to-end checks for the tester binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::NamedTempFile;

fn write_card(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write card");
    file
}

fn tester() -> Command {
    Command::cargo_bin("cardframe-tester").expect("tester binary")
}

#[test]
fn render_prints_the_ui_tree_as_json() {
    let card = json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [{"type": "TextBlock", "text": "hello"}],
    });
    let file = write_card(&card.to_string());

    let output = tester()
        .arg("render")
        .arg(file.path())
        .output()
        .expect("tester runs");
    assert!(output.status.success());

    let printed: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(printed["root"]["kind"], "panel");
    assert_eq!(printed["root"]["children"][0]["kind"], "text");
    assert_eq!(printed["root"]["children"][0]["text"], "hello");
    assert_eq!(printed["pendingLoads"], 0);
}

#[test]
fn parse_round_trips_the_card() {
    let card = json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [{"type": "TextBlock", "text": "hi", "wrap": true}],
    });
    let file = write_card(&card.to_string());

    let output = tester()
        .arg("parse")
        .arg(file.path())
        .output()
        .expect("tester runs");
    assert!(output.status.success());

    let printed: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(printed["card"], card);
    assert_eq!(printed["errors"], json!([]));
}

#[test]
fn embedded_symbol_images_resolve_without_a_network() {
    let card = json!({
        "type": "AdaptiveCard",
        "version": "1.5",
        "body": [{"type": "Image", "url": "symbol:star"}],
    });
    let file = write_card(&card.to_string());

    let output = tester()
        .args(["render", "--resolve"])
        .arg(file.path())
        .output()
        .expect("tester runs");
    assert!(output.status.success());

    let printed: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(printed["deliveredLoads"], 1);
    assert_eq!(printed["root"]["children"][0]["state"], "ready");
}

#[test]
fn missing_card_file_exits_with_code_one() {
    tester()
        .args(["render", "/no/such/card.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("card read failed"));
}

#[test]
fn malformed_json_still_prints_its_diagnostics() {
    let file = write_card("{ this is not json");
    tester()
        .arg("parse")
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("invalid_json"));
}

#[test]
fn bad_fixed_size_exits_with_code_two() {
    let card = json!({"type": "AdaptiveCard", "version": "1.5", "body": []});
    let file = write_card(&card.to_string());
    tester()
        .arg("render")
        .arg(file.path())
        .args(["--fixed-size", "banana"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("WIDTHxHEIGHT"));
}
