//! Error types for the knowledge engine.

use thiserror::Error;

/// All errors that can occur in the knowledge engine.
#[derive(Error, Debug)]
pub enum KbError {
    /// An entry in the catalogue feed has an empty ID.
    #[error("Entry has an empty ID")]
    EmptyEntryId,

    /// Two entries in the catalogue feed share an ID.
    #[error("Duplicate entry ID: {0}")]
    DuplicateEntryId(String),

    /// An entry carries no tags.
    #[error("Entry {0} carries no tags")]
    EmptyTags(String),

    /// An entry's trust metadata cites no sources.
    #[error("Entry {0} cites no knowledge sources")]
    EmptySources(String),

    /// Confidence value out of valid range.
    #[error("Confidence out of range [0.0, 1.0] on entry {id}: {value}")]
    InvalidConfidence { id: String, value: f64 },

    /// Pattern complexity out of valid range.
    #[error("Complexity out of range [1, 5] on pattern {id}: {value}")]
    InvalidComplexity { id: String, value: u8 },

    /// An entry references a component type the catalogue does not know.
    #[error("Entry {id} references unknown component type: {component}")]
    UnknownComponent { id: String, component: String },

    /// A pattern evolution edge does not resolve to another pattern entry.
    #[error("Pattern {id} has an unresolved evolution edge: {target}")]
    UnresolvedEvolution { id: String, target: String },

    /// A failure scenario lists too little prevention or mitigation guidance.
    #[error("Failure scenario {id} needs at least {min} {field} items")]
    TooFewGuidanceItems {
        id: String,
        field: &'static str,
        min: usize,
    },

    /// An anti-pattern detection predicate reported a failure.
    #[error("Detector error: {0}")]
    Detector(String),
}

/// Convenience result type for knowledge engine operations.
pub type KbResult<T> = Result<T, KbError>;
