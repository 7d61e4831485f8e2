//! End-to-end runs of the `codwoe` binary.

use std::process::{Command, Output};

use serde_json::{Value, json};

use super::write_json;

fn codwoe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_codwoe"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run codwoe")
}

fn codwoe_with_log(args: &[&str], rust_log: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_codwoe"))
        .args(args)
        .env("RUST_LOG", rust_log)
        .output()
        .expect("failed to run codwoe")
}

fn defmod_items(lang: &str) -> Value {
    json!([
        {"id": format!("{}.defmod.1", lang), "gloss": "one"},
        {"id": format!("{}.defmod.2", lang), "gloss": "two"},
    ])
}

#[test]
fn test_check_format_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "en.defmod.json", &defmod_items("en"));

    let output = codwoe(&["check-format", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no problems were identified"));
    assert!(stdout.contains("Submission on track defmod for language en, 2 predictions."));
}

#[test]
fn test_check_format_failure_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "de.defmod.json", &defmod_items("de"));

    let output = codwoe(&["--quiet", "check-format", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown language de"));
}

#[test]
fn test_keep_going_reports_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write_json(&dir, "bad.json", &json!([{"word": "no id"}]));
    let good = write_json(&dir, "good.json", &defmod_items("it"));

    let output = codwoe(&[
        "-q",
        "check-format",
        "--keep-going",
        "--format",
        "json",
        bad.to_str().unwrap(),
        good.to_str().unwrap(),
    ]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdicts: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0]["status"], "failed");
    assert_eq!(verdicts[0]["kind"], "MissingId");
    assert_eq!(verdicts[1]["status"], "ok");
    assert_eq!(verdicts[1]["summary"]["language"], "it");
}

#[test]
fn test_first_failure_stops_without_keep_going() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write_json(&dir, "bad.json", &json!({"not": "an array"}));
    let good = write_json(&dir, "good.json", &defmod_items("es"));

    let output = codwoe(&[
        "-q",
        "check-format",
        "--format",
        "json",
        bad.to_str().unwrap(),
        good.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("MalformedInput"));
}

#[test]
fn test_stats_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(
        &dir,
        "en.train.json",
        &json!([
            {"id": "en.train.1", "gloss": "a b", "sgns": [0.1]},
            {"id": "en.train.2", "gloss": "c", "sgns": [0.2]},
        ]),
    );

    let output = codwoe(&["-q", "stats", path.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());
    let stats: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["total_entries"], 2);
    assert_eq!(stats["unique_words"], 3);
    assert_eq!(stats["embedding_types"], json!(["sgns"]));
}

#[test]
fn test_bad_registry_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "en.defmod.json", &defmod_items("en"));
    let registry = write_json(&dir, "registry.json", &json!({"tracks": {}}));

    let output = codwoe(&[
        "-q",
        "check-format",
        "--registry",
        registry.to_str().unwrap(),
        path.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no track declared"));
}

#[test]
fn test_rust_log_raises_default_level() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "en.defmod.json", &defmod_items("en"));
    let registry = write_json(&dir, "registry.json", &json!({}));
    let args = [
        "check-format",
        "--registry",
        registry.to_str().unwrap(),
        path.to_str().unwrap(),
    ];

    let output = codwoe_with_log(&args, "codwoe=debug");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loading registry from"));

    let output = codwoe(&args);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Loading registry from"));
    assert!(stderr.contains("Checking the format of the submission file"));
}

#[test]
fn test_quiet_overrides_rust_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "en.defmod.json", &defmod_items("en"));

    let output = codwoe_with_log(&["-q", "check-format", path.to_str().unwrap()], "codwoe=debug");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Checking the format of the submission file"));
}
