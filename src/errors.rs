use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error type for everything that is not a submission verdict
#[derive(Error, Debug)]
pub enum CodwoeError {
    /// IO errors that occur during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Registry configuration errors
    #[error("Failed to load registry from {}: {reason}", .path.display())]
    ConfigLoad {
        path: PathBuf,
        reason: String,
    },

    /// Dataset loading errors
    #[error("Failed to load dataset from {}: {reason}", .path.display())]
    DatasetLoad {
        path: PathBuf,
        reason: String,
    },

    /// A submission was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Type alias for the crate's Result type
pub type Result<T> = std::result::Result<T, CodwoeError>;

/// Flat taxonomy of submission failures, one per checked invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    MalformedInput,
    MissingId,
    MalformedId,
    AmbiguousLanguage,
    AmbiguousTrack,
    UnknownTrack,
    UnknownLanguage,
    IncompleteOrDuplicateIds,
    NoVectorArchitecture,
    InconsistentVectorFields,
    UnknownVectorArchitecture,
    MissingGloss,
}

/// Why a submission file was rejected.
///
/// Every variant names the file it came from; the message is meant to be
/// shown as-is to whoever has to fix the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File \"{file}\": could not be read as a submission ({reason}), submission will fail.")]
    MalformedInput {
        file: String,
        reason: String,
    },

    #[error("File \"{file}\": one or more items do not contain an id (first at item {index}), submission will fail.")]
    MissingId {
        file: String,
        index: usize,
    },

    #[error("File \"{file}\": malformed id {id} ({reason}), submission will fail.")]
    MalformedId {
        file: String,
        id: String,
        reason: String,
    },

    #[error("File \"{file}\": ids do not identify a unique language (found: {}), submission will fail.", .found.join(", "))]
    AmbiguousLanguage {
        file: String,
        found: Vec<String>,
    },

    #[error("File \"{file}\": ids do not identify a unique track (found: {}), submission will fail.", .found.join(", "))]
    AmbiguousTrack {
        file: String,
        found: Vec<String>,
    },

    #[error("File \"{file}\": unknown track identified {track} (expected one of: {}), submission will fail.", .expected.join(", "))]
    UnknownTrack {
        file: String,
        track: String,
        expected: Vec<String>,
    },

    #[error("File \"{file}\": unknown language {language} (expected one of: {}), submission will fail.", .expected.join(", "))]
    UnknownLanguage {
        file: String,
        language: String,
        expected: Vec<String>,
    },

    #[error("File \"{file}\": ids do not identify all items in dataset (expected serials 1 to {count}, found {distinct} distinct serials), submission will fail.")]
    IncompleteOrDuplicateIds {
        file: String,
        count: usize,
        distinct: usize,
    },

    #[error("File \"{file}\": no vector architecture was found, revdict submission will fail.")]
    NoVectorArchitecture {
        file: String,
    },

    #[error("File \"{file}\": some items do not contain all the expected vectors (item {id}: missing [{}], unexpected [{}]), revdict submission will fail.", .missing.join(", "), .unexpected.join(", "))]
    InconsistentVectorFields {
        file: String,
        index: usize,
        id: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("File \"{file}\": unknown vector architecture(s) {}, revdict submission will fail.", .unknown.join(", "))]
    UnknownVectorArchitecture {
        file: String,
        unknown: Vec<String>,
    },

    #[error("File \"{file}\": some items do not contain a gloss (first: {id}), defmod submission will fail.")]
    MissingGloss {
        file: String,
        index: usize,
        id: String,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::MalformedInput { .. } => ValidationErrorKind::MalformedInput,
            ValidationError::MissingId { .. } => ValidationErrorKind::MissingId,
            ValidationError::MalformedId { .. } => ValidationErrorKind::MalformedId,
            ValidationError::AmbiguousLanguage { .. } => ValidationErrorKind::AmbiguousLanguage,
            ValidationError::AmbiguousTrack { .. } => ValidationErrorKind::AmbiguousTrack,
            ValidationError::UnknownTrack { .. } => ValidationErrorKind::UnknownTrack,
            ValidationError::UnknownLanguage { .. } => ValidationErrorKind::UnknownLanguage,
            ValidationError::IncompleteOrDuplicateIds { .. } => {
                ValidationErrorKind::IncompleteOrDuplicateIds
            }
            ValidationError::NoVectorArchitecture { .. } => {
                ValidationErrorKind::NoVectorArchitecture
            }
            ValidationError::InconsistentVectorFields { .. } => {
                ValidationErrorKind::InconsistentVectorFields
            }
            ValidationError::UnknownVectorArchitecture { .. } => {
                ValidationErrorKind::UnknownVectorArchitecture
            }
            ValidationError::MissingGloss { .. } => ValidationErrorKind::MissingGloss,
        }
    }

    /// The source identifier (usually a path) of the rejected submission.
    pub fn file(&self) -> &str {
        match self {
            ValidationError::MalformedInput { file, .. }
            | ValidationError::MissingId { file, .. }
            | ValidationError::MalformedId { file, .. }
            | ValidationError::AmbiguousLanguage { file, .. }
            | ValidationError::AmbiguousTrack { file, .. }
            | ValidationError::UnknownTrack { file, .. }
            | ValidationError::UnknownLanguage { file, .. }
            | ValidationError::IncompleteOrDuplicateIds { file, .. }
            | ValidationError::NoVectorArchitecture { file }
            | ValidationError::InconsistentVectorFields { file, .. }
            | ValidationError::UnknownVectorArchitecture { file, .. }
            | ValidationError::MissingGloss { file, .. } => file,
        }
    }
}
