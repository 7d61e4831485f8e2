use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::registry::{Registry, TrackKind};

/// A submission item as it comes out of the JSON file.
pub type RawRecord = Map<String, Value>;

/// Decoded `<lang>.<track>.<serial>` item id.
///
/// Language is the first dot-separated segment, the track the second to
/// last, the serial the last. Anything in between is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionId {
    pub language: String,
    pub track: String,
    pub serial_text: String,
}

impl SubmissionId {
    /// Split an id into its segments. Returns `None` when there are fewer
    /// than three segments.
    pub fn parse(id: &str) -> Option<Self> {
        let segments: Vec<&str> = id.split('.').collect();
        if segments.len() < 3 {
            return None;
        }
        let n = segments.len();
        Some(Self {
            language: segments[0].to_string(),
            track: segments[n - 2].to_string(),
            serial_text: segments[n - 1].to_string(),
        })
    }

    pub fn serial(&self) -> Result<i64, std::num::ParseIntError> {
        self.serial_text.parse::<i64>()
    }
}

/// Definition modeling item: the predicted gloss.
#[derive(Debug, Clone, PartialEq)]
pub struct DefmodRecord {
    pub id: String,
    pub gloss: String,
    pub extras: RawRecord,
}

/// Reverse dictionary item: one predicted vector per architecture.
#[derive(Debug, Clone, PartialEq)]
pub struct RevdictRecord {
    pub id: String,
    pub word: Option<String>,
    pub vectors: BTreeMap<String, Value>,
    pub extras: RawRecord,
}

/// A submission item typed according to its track.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Defmod(DefmodRecord),
    Revdict(RevdictRecord),
}

impl Record {
    /// Type a raw item for the given track kind. Returns `None` if a
    /// field the track requires is absent or not a string.
    pub fn decode(raw: &RawRecord, kind: TrackKind, registry: &Registry) -> Option<Self> {
        let id = raw.get("id")?.as_str()?.to_string();
        let mut extras = raw.clone();
        extras.remove("id");

        match kind {
            TrackKind::DefinitionModeling => {
                let gloss = extras.remove("gloss")?;
                let gloss = gloss.as_str()?.to_string();
                Some(Record::Defmod(DefmodRecord { id, gloss, extras }))
            }
            TrackKind::ReverseDictionary => {
                // a non-string word stays in extras
                let word = extras
                    .get("word")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                if word.is_some() {
                    extras.remove("word");
                }

                let names: Vec<String> = extras
                    .keys()
                    .filter(|key| registry.is_vector_field(key))
                    .cloned()
                    .collect();
                let mut vectors = BTreeMap::new();
                for name in names {
                    if let Some(value) = extras.remove(&name) {
                        vectors.insert(name, value);
                    }
                }
                Some(Record::Revdict(RevdictRecord {
                    id,
                    word,
                    vectors,
                    extras,
                }))
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Defmod(r) => &r.id,
            Record::Revdict(r) => &r.id,
        }
    }
}
