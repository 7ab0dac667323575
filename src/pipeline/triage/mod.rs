pub mod types;
pub mod tables;
pub mod text;
pub mod classify;
pub mod recovery;
pub mod trend;
pub mod location;
pub mod clarify;
pub mod followup;
pub mod instructions;
pub mod orchestrator;

use thiserror::Error;

use crate::pipeline::safety::types::PolicyError;

pub use orchestrator::TriageOrchestrator;
pub use tables::TriageTables;
pub use types::{TriageOutcome, TriageRequest};

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Invalid detector pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Configuration error: {0}")]
    Config(String),
}
