use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::errors::{CodwoeError, Result};
use crate::registry::Registry;

/// Summary statistics over a dataset of glossed items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total_entries: usize,
    pub unique_words: usize,
    pub avg_gloss_length: f64,
    /// Vector fields seen on any item, sorted
    pub embedding_types: Vec<String>,
    /// Gloss length in words -> number of items
    pub gloss_length_distribution: BTreeMap<usize, usize>,
}

impl DatasetStats {
    /// Items that are not JSON objects count as entries with an empty gloss.
    pub fn from_records(items: &[Value], registry: &Registry) -> Self {
        let mut unique_words: HashSet<&str> = HashSet::new();
        let mut embedding_types = BTreeSet::new();
        let mut gloss_length_distribution = BTreeMap::new();
        let mut total_words = 0usize;

        for item in items {
            let gloss = item.get("gloss").and_then(Value::as_str).unwrap_or("");
            let words: Vec<&str> = gloss.split_whitespace().collect();
            total_words += words.len();
            *gloss_length_distribution.entry(words.len()).or_insert(0) += 1;
            unique_words.extend(words);

            if let Some(object) = item.as_object() {
                embedding_types.extend(registry.vector_fields(object.keys()));
            }
        }

        let avg_gloss_length = if items.is_empty() {
            0.0
        } else {
            total_words as f64 / items.len() as f64
        };

        Self {
            total_entries: items.len(),
            unique_words: unique_words.len(),
            avg_gloss_length,
            embedding_types: embedding_types.into_iter().collect(),
            gloss_length_distribution,
        }
    }

    /// Load a dataset file (a JSON array of items) and compute its statistics.
    pub fn from_file<P: AsRef<Path>>(path: P, registry: &Registry) -> Result<Self> {
        let items = load_dataset(path)?;
        Ok(Self::from_records(&items, registry))
    }
}

pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(items) => Ok(items),
        _ => Err(CodwoeError::DatasetLoad {
            path: path.to_path_buf(),
            reason: "expected a JSON array of items".to_string(),
        }),
    }
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Statistics:")?;
        writeln!(f, "- Total Entries: {}", self.total_entries)?;
        writeln!(f, "- Unique Words in Glosses: {}", self.unique_words)?;
        writeln!(f, "- Average Gloss Length: {:.2} words", self.avg_gloss_length)?;
        writeln!(f, "- Embedding Types: {}", self.embedding_types.join(", "))?;
        writeln!(f)?;
        write!(f, "Gloss Length Distribution (Number of words):")?;
        for (length, count) in &self.gloss_length_distribution {
            write!(f, "\n  {} words: {} entries", length, count)?;
        }
        Ok(())
    }
}
