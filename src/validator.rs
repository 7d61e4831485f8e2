//! Submission format validation.
//!
//! A submission is a JSON array of items sharing one track and one language.
//! [`SubmissionValidator`] checks it in a fixed order and stops at the first
//! violated rule:
//!
//! 1. the file parses as an array of objects
//! 2. every item has an `id`, shaped `<lang>.<track>.<serial>`
//! 3. ids agree on a single language, then on a single track
//! 4. track and language are known to the [`Registry`]
//! 5. serials cover `1..=n` exactly
//! 6. reverse dictionary: the first item's vector fields are non-empty, shared
//!    by every item, and all recognized architectures
//! 7. definition modeling: every item has a `gloss`
//!
//! Later checks assume earlier ones passed, so the order is part of the
//! contract. The validator does no logging of its own; intermediate findings
//! go to a [`ValidationObserver`] supplied by the caller.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::num::IntErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::errors::ValidationError;
use crate::record::{RawRecord, Record, SubmissionId};
use crate::registry::{Registry, TrackKind};

/// Something the validator learned on its way through a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Loaded { count: usize },
    Ids(Vec<String>),
    Languages(BTreeSet<String>),
    Tracks(BTreeSet<String>),
    TrackIdentified(String),
    LanguageIdentified(String),
    Serials(Vec<i64>),
    VectorArchitectures(BTreeSet<String>),
}

fn join<'a, I: IntoIterator<Item = &'a String>>(items: I) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Loaded { count } => write!(f, "Successfully loaded. Found {} items.", count),
            Finding::Ids(ids) => write!(f, "Extracted IDs: [{}]", join(ids)),
            Finding::Languages(langs) => write!(f, "Languages found: {{{}}}", join(langs)),
            Finding::Tracks(tracks) => write!(f, "Tracks found: {{{}}}", join(tracks)),
            Finding::TrackIdentified(track) => write!(f, "Track identified: {}", track),
            Finding::LanguageIdentified(lang) => write!(f, "Language identified: {}", lang),
            Finding::Serials(serials) => {
                let serials: Vec<String> = serials.iter().map(|s| s.to_string()).collect();
                write!(f, "Serial numbers found: [{}]", serials.join(", "))
            }
            Finding::VectorArchitectures(archs) => {
                write!(f, "Vector architectures found: {{{}}}", join(archs))
            }
        }
    }
}

/// Receives intermediate findings during validation.
pub trait ValidationObserver {
    fn observe(&mut self, finding: &Finding);
}

/// Observer that drops every finding.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ValidationObserver for NoopObserver {
    fn observe(&mut self, _finding: &Finding) {}
}

impl<F: FnMut(&Finding)> ValidationObserver for F {
    fn observe(&mut self, finding: &Finding) {
        self(finding)
    }
}

/// How an accepted submission will be understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub source: String,
    pub track: String,
    pub kind: TrackKind,
    pub language: String,
    pub count: usize,
    /// Sorted architecture tags; `None` for definition modeling
    pub vector_architectures: Option<Vec<String>>,
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File \"{}\": no problems were identified.", self.source)?;
        writeln!(f, "The submission will be understood as follows:")?;
        write!(
            f,
            "\tSubmission on track {} for language {}, {} predictions.",
            self.track, self.language, self.count
        )?;
        if let Some(archs) = &self.vector_architectures {
            write!(
                f,
                "\n\tSubmission predicts these embeddings: {}.",
                archs.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Checks submissions against a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct SubmissionValidator<'r> {
    registry: &'r Registry,
}

impl<'r> SubmissionValidator<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Read and validate a submission file.
    pub fn validate_file<P, O>(
        &self,
        path: P,
        observer: &mut O,
    ) -> Result<ValidationSummary, ValidationError>
    where
        P: AsRef<Path>,
        O: ValidationObserver + ?Sized,
    {
        let (source, items) = load_items(path.as_ref())?;
        self.validate(&source, &items, observer)
    }

    /// Validate submission text. `source` names it in errors and summary.
    pub fn validate_str<O>(
        &self,
        source: &str,
        text: &str,
        observer: &mut O,
    ) -> Result<ValidationSummary, ValidationError>
    where
        O: ValidationObserver + ?Sized,
    {
        let items = parse_items(source, text)?;
        self.validate(source, &items, observer)
    }

    /// Validate an already parsed JSON document.
    pub fn validate<O>(
        &self,
        source: &str,
        items: &Value,
        observer: &mut O,
    ) -> Result<ValidationSummary, ValidationError>
    where
        O: ValidationObserver + ?Sized,
    {
        let records = as_records(source, items)?;
        self.validate_records(source, &records, observer)
    }

    /// Validate items already known to be JSON objects.
    pub fn validate_records<O>(
        &self,
        source: &str,
        records: &[&RawRecord],
        observer: &mut O,
    ) -> Result<ValidationSummary, ValidationError>
    where
        O: ValidationObserver + ?Sized,
    {
        let file = || source.to_string();
        observer.observe(&Finding::Loaded {
            count: records.len(),
        });

        if let Some(index) = records.iter().position(|r| !r.contains_key("id")) {
            return Err(ValidationError::MissingId {
                file: file(),
                index,
            });
        }

        let mut raw_ids = Vec::with_capacity(records.len());
        for record in records {
            match &record["id"] {
                Value::String(id) => raw_ids.push(id.clone()),
                other => {
                    return Err(ValidationError::MalformedId {
                        file: file(),
                        id: other.to_string(),
                        reason: "id is not a string".to_string(),
                    });
                }
            }
        }
        let mut sorted_ids = raw_ids.clone();
        sorted_ids.sort();
        observer.observe(&Finding::Ids(sorted_ids));

        let mut ids = Vec::with_capacity(raw_ids.len());
        for raw in &raw_ids {
            let id = SubmissionId::parse(raw).ok_or_else(|| ValidationError::MalformedInput {
                file: file(),
                reason: format!("id \"{}\" is not of the form <lang>.<track>.<serial>", raw),
            })?;
            ids.push(id);
        }

        let languages: BTreeSet<String> = ids.iter().map(|id| id.language.clone()).collect();
        observer.observe(&Finding::Languages(languages.clone()));
        if languages.len() != 1 {
            return Err(ValidationError::AmbiguousLanguage {
                file: file(),
                found: languages.into_iter().collect(),
            });
        }

        let tracks: BTreeSet<String> = ids.iter().map(|id| id.track.clone()).collect();
        observer.observe(&Finding::Tracks(tracks.clone()));
        if tracks.len() != 1 {
            return Err(ValidationError::AmbiguousTrack {
                file: file(),
                found: tracks.into_iter().collect(),
            });
        }

        let track = ids[0].track.clone();
        observer.observe(&Finding::TrackIdentified(track.clone()));
        let kind = self
            .registry
            .track_kind(&track)
            .ok_or_else(|| ValidationError::UnknownTrack {
                file: file(),
                track: track.clone(),
                expected: self.registry.tracks.keys().cloned().collect(),
            })?;

        let language = ids[0].language.clone();
        observer.observe(&Finding::LanguageIdentified(language.clone()));
        if !self.registry.is_language(&language) {
            return Err(ValidationError::UnknownLanguage {
                file: file(),
                language,
                expected: self.registry.languages.iter().cloned().collect(),
            });
        }

        let mut serials = BTreeSet::new();
        // integers too large for i64 can never be in range
        let mut oversized = BTreeSet::new();
        for (id, raw) in ids.iter().zip(&raw_ids) {
            match id.serial() {
                Ok(serial) => {
                    serials.insert(serial);
                }
                Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                    oversized.insert(id.serial_text.clone());
                }
                Err(e) => {
                    return Err(ValidationError::MalformedId {
                        file: file(),
                        id: raw.clone(),
                        reason: format!("serial \"{}\" is not an integer: {}", id.serial_text, e),
                    });
                }
            }
        }
        let serials: Vec<i64> = serials.into_iter().collect();
        observer.observe(&Finding::Serials(serials.clone()));
        let expected = 1..=records.len() as i64;
        if !oversized.is_empty() || !serials.iter().copied().eq(expected) {
            return Err(ValidationError::IncompleteOrDuplicateIds {
                file: file(),
                count: records.len(),
                distinct: serials.len() + oversized.len(),
            });
        }

        let vector_architectures = match kind {
            TrackKind::ReverseDictionary => {
                Some(self.check_vectors(source, records, &raw_ids, observer)?)
            }
            TrackKind::DefinitionModeling => {
                if let Some(index) = records.iter().position(|r| !r.contains_key("gloss")) {
                    return Err(ValidationError::MissingGloss {
                        file: file(),
                        index,
                        id: raw_ids[index].clone(),
                    });
                }
                None
            }
        };

        Ok(ValidationSummary {
            source: file(),
            track,
            kind,
            language,
            count: records.len(),
            vector_architectures,
        })
    }

    fn check_vectors<O>(
        &self,
        source: &str,
        records: &[&RawRecord],
        ids: &[String],
        observer: &mut O,
    ) -> Result<Vec<String>, ValidationError>
    where
        O: ValidationObserver + ?Sized,
    {
        let expected = self.registry.vector_fields(records[0].keys());
        observer.observe(&Finding::VectorArchitectures(expected.clone()));
        if expected.is_empty() {
            return Err(ValidationError::NoVectorArchitecture {
                file: source.to_string(),
            });
        }

        for (index, record) in records.iter().enumerate() {
            let found = self.registry.vector_fields(record.keys());
            if found != expected {
                return Err(ValidationError::InconsistentVectorFields {
                    file: source.to_string(),
                    index,
                    id: ids[index].clone(),
                    missing: expected.difference(&found).cloned().collect(),
                    unexpected: found.difference(&expected).cloned().collect(),
                });
            }
        }

        let unknown: Vec<String> = expected
            .difference(&self.registry.architectures)
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownVectorArchitecture {
                file: source.to_string(),
                unknown,
            });
        }

        Ok(expected.into_iter().collect())
    }
}

fn load_items(path: &Path) -> Result<(String, Value), ValidationError> {
    let source = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| ValidationError::MalformedInput {
        file: source.clone(),
        reason: e.to_string(),
    })?;
    let items = parse_items(&source, &text)?;
    Ok((source, items))
}

fn parse_items(source: &str, text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|e| ValidationError::MalformedInput {
        file: source.to_string(),
        reason: e.to_string(),
    })
}

fn as_records<'v>(source: &str, items: &'v Value) -> Result<Vec<&'v RawRecord>, ValidationError> {
    let array = items
        .as_array()
        .ok_or_else(|| ValidationError::MalformedInput {
            file: source.to_string(),
            reason: "expected a JSON array of items".to_string(),
        })?;
    array
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object()
                .ok_or_else(|| ValidationError::MalformedInput {
                    file: source.to_string(),
                    reason: format!("item {} is not a JSON object", index),
                })
        })
        .collect()
}

/// A validated submission with its items typed for the identified track.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub summary: ValidationSummary,
    pub records: Vec<Record>,
}

impl Submission {
    /// Load and validate a submission file, then type its items.
    pub fn load<P, O>(
        path: P,
        registry: &Registry,
        observer: &mut O,
    ) -> Result<Self, ValidationError>
    where
        P: AsRef<Path>,
        O: ValidationObserver + ?Sized,
    {
        let (source, items) = load_items(path.as_ref())?;
        Self::from_value(&source, &items, registry, observer)
    }

    pub fn from_value<O>(
        source: &str,
        items: &Value,
        registry: &Registry,
        observer: &mut O,
    ) -> Result<Self, ValidationError>
    where
        O: ValidationObserver + ?Sized,
    {
        let raw = as_records(source, items)?;
        let summary = SubmissionValidator::new(registry).validate_records(source, &raw, observer)?;

        let records = raw
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Record::decode(item, summary.kind, registry).ok_or_else(|| {
                    ValidationError::MalformedInput {
                        file: source.to_string(),
                        reason: format!(
                            "item {} does not fit the {} track schema",
                            index, summary.track
                        ),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { summary, records })
    }
}
