use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CodwoeError, Result};

/// What a track asks participants to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Glosses generated from embeddings; every item needs a `gloss`.
    DefinitionModeling,
    /// Embeddings predicted from glosses; every item carries vector fields.
    ReverseDictionary,
}

/// Accepted tracks, languages and vector architectures.
///
/// The validator only consults this; it never hard-codes the shared-task
/// constants, so new tracks or languages are a configuration change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Track tag (as found in ids) to track kind
    pub tracks: BTreeMap<String, TrackKind>,

    /// Language codes (first id segment)
    pub languages: BTreeSet<String>,

    /// Recognized embedding architectures for reverse dictionary submissions
    pub architectures: BTreeSet<String>,

    /// Item fields that are never vectors
    pub non_vector_fields: BTreeSet<String>,
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Registry {
    fn default() -> Self {
        let mut tracks = BTreeMap::new();
        tracks.insert("defmod".to_string(), TrackKind::DefinitionModeling);
        tracks.insert("revdict".to_string(), TrackKind::ReverseDictionary);

        Self {
            tracks,
            languages: to_set(&["en", "es", "fr", "it", "ru"]),
            architectures: to_set(&["sgns", "char", "electra"]),
            non_vector_fields: to_set(&[
                "id",
                "gloss",
                "word",
                "pos",
                "concrete",
                "example",
                "f_rnk",
                "counts",
                "polysemous",
            ]),
        }
    }
}

impl Registry {
    /// Load a registry from a JSON file. Keys left out of the file keep
    /// their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CodwoeError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let registry: Registry =
            serde_json::from_str(&text).map_err(|e| CodwoeError::ConfigLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if registry.tracks.is_empty() {
            return Err(CodwoeError::ConfigLoad {
                path: path.to_path_buf(),
                reason: "no track declared".to_string(),
            });
        }
        if registry.languages.is_empty() {
            return Err(CodwoeError::ConfigLoad {
                path: path.to_path_buf(),
                reason: "no language declared".to_string(),
            });
        }

        Ok(registry)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn with_track(mut self, tag: impl Into<String>, kind: TrackKind) -> Self {
        self.tracks.insert(tag.into(), kind);
        self
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.languages.insert(code.into());
        self
    }

    pub fn with_architecture(mut self, tag: impl Into<String>) -> Self {
        self.architectures.insert(tag.into());
        self
    }

    pub fn track_kind(&self, track: &str) -> Option<TrackKind> {
        self.tracks.get(track).copied()
    }

    pub fn is_language(&self, code: &str) -> bool {
        self.languages.contains(code)
    }

    pub fn is_vector_field(&self, field: &str) -> bool {
        !self.non_vector_fields.contains(field)
    }

    /// Field names of a record that are treated as vector architectures.
    pub fn vector_fields<'a, I>(&self, keys: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        keys.into_iter()
            .filter(|key| self.is_vector_field(key))
            .cloned()
            .collect()
    }
}
