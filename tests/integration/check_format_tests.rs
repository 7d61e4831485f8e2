//! Submission checks against files on disk.

use std::fs;

use codwoe::{
    Finding, NoopObserver, Record, Registry, Submission, SubmissionValidator, TrackKind,
    ValidationErrorKind,
};
use serde_json::{Value, json};

use super::write_json;

fn revdict_pair() -> Value {
    json!([
        {"id": "en.revdict.1", "gloss": "a feline", "word": "cat", "sgns": [0.1, 0.2], "char": [0.3, 0.4]},
        {"id": "en.revdict.2", "gloss": "a canine", "word": "dog", "sgns": [0.5, 0.6], "char": [0.7, 0.8]},
    ])
}

fn check_kind(items: &Value) -> ValidationErrorKind {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "submission.json", items);
    let registry = Registry::default();
    SubmissionValidator::new(&registry)
        .validate_file(&path, &mut NoopObserver)
        .unwrap_err()
        .kind()
}

#[test]
fn test_valid_revdict_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "en.revdict.json", &revdict_pair());
    let registry = Registry::default();

    let summary = SubmissionValidator::new(&registry)
        .validate_file(&path, &mut NoopObserver)
        .unwrap();
    assert_eq!(summary.source, path.display().to_string());
    assert_eq!(summary.track, "revdict");
    assert_eq!(summary.language, "en");
    assert_eq!(summary.count, 2);
    assert_eq!(
        summary.vector_architectures,
        Some(vec!["char".to_string(), "sgns".to_string()])
    );
}

#[test]
fn test_revdict_file_missing_a_vector() {
    let mut items = revdict_pair();
    items[1].as_object_mut().unwrap().remove("char");
    assert_eq!(check_kind(&items), ValidationErrorKind::InconsistentVectorFields);
}

#[test]
fn test_defmod_file_missing_gloss() {
    let items = json!([
        {"id": "fr.defmod.1", "gloss": "animal domestique"},
        {"id": "fr.defmod.2", "word": "chien"},
    ]);
    assert_eq!(check_kind(&items), ValidationErrorKind::MissingGloss);
}

#[test]
fn test_unknown_track_file() {
    let items = json!([{"id": "en.summarize.1", "gloss": "x"}]);
    assert_eq!(check_kind(&items), ValidationErrorKind::UnknownTrack);
}

#[test]
fn test_unknown_language_file() {
    let items = json!([{"id": "de.defmod.1", "gloss": "x"}]);
    assert_eq!(check_kind(&items), ValidationErrorKind::UnknownLanguage);
}

#[test]
fn test_missing_id_regardless_of_content() {
    let items = json!([
        {"id": "zz.nothing.0"},
        {"id": "en.defmod.1", "gloss": "x"},
        {"word": "anonymous"},
    ]);
    assert_eq!(check_kind(&items), ValidationErrorKind::MissingId);
}

#[test]
fn test_unreadable_and_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::default();
    let validator = SubmissionValidator::new(&registry);

    let missing = dir.path().join("missing.json");
    let err = validator.validate_file(&missing, &mut NoopObserver).unwrap_err();
    assert_eq!(err.kind(), ValidationErrorKind::MalformedInput);
    assert_eq!(err.file(), missing.display().to_string());

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "not json at all").unwrap();
    let err = validator.validate_file(&garbage, &mut NoopObserver).unwrap_err();
    assert_eq!(err.kind(), ValidationErrorKind::MalformedInput);
}

#[test]
fn test_registry_from_file_changes_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let registry_path = dir.path().join("registry.json");
    fs::write(
        &registry_path,
        r#"{"languages": ["de"], "architectures": ["bert"]}"#,
    )
    .unwrap();
    let registry = Registry::load(&registry_path).unwrap();
    let validator = SubmissionValidator::new(&registry);

    let items = json!([{"id": "de.revdict.1", "bert": [0.1]}]);
    let path = write_json(&dir, "de.json", &items);
    let summary = validator.validate_file(&path, &mut NoopObserver).unwrap();
    assert_eq!(summary.language, "de");
    assert_eq!(summary.vector_architectures, Some(vec!["bert".to_string()]));

    let items = json!([{"id": "en.revdict.1", "bert": [0.1]}]);
    let path = write_json(&dir, "en.json", &items);
    let err = validator.validate_file(&path, &mut NoopObserver).unwrap_err();
    assert_eq!(err.kind(), ValidationErrorKind::UnknownLanguage);
}

#[test]
fn test_submission_load_types_revdict_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "en.revdict.json", &revdict_pair());
    let registry = Registry::default();

    let mut findings = Vec::new();
    let submission = Submission::load(&path, &registry, &mut |f: &Finding| {
        findings.push(f.clone())
    })
    .unwrap();

    assert_eq!(submission.summary.kind, TrackKind::ReverseDictionary);
    assert_eq!(submission.records.len(), 2);
    match &submission.records[0] {
        Record::Revdict(record) => {
            assert_eq!(record.word.as_deref(), Some("cat"));
            assert_eq!(record.vectors["sgns"], json!([0.1, 0.2]));
        }
        other => panic!("unexpected record: {:?}", other),
    }
    assert!(findings.contains(&Finding::LanguageIdentified("en".to_string())));
}

#[test]
fn test_large_shuffled_submission() {
    let n = 500;
    let items: Vec<Value> = (1..=n)
        .rev()
        .map(|i| json!({"id": format!("ru.defmod.{}", i), "gloss": "слово"}))
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "ru.json", &Value::Array(items));
    let registry = Registry::default();

    let summary = SubmissionValidator::new(&registry)
        .validate_file(&path, &mut NoopObserver)
        .unwrap();
    assert_eq!(summary.count, n);
}
