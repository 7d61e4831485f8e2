//! Baseline tooling for the definition modeling and reverse dictionary
//! shared task: submission format checking and dataset statistics.

pub mod cli;
pub mod errors;
pub mod record;
pub mod registry;
pub mod stats;
pub mod validator;

pub use errors::{CodwoeError, Result, ValidationError, ValidationErrorKind};
pub use record::{DefmodRecord, RawRecord, Record, RevdictRecord, SubmissionId};
pub use registry::{Registry, TrackKind};
pub use stats::DatasetStats;
pub use validator::{
    Finding, NoopObserver, Submission, SubmissionValidator, ValidationObserver, ValidationSummary,
};
