//! Conflict records produced when a proposed fact is checked against the
//! catalogue.

use serde::{Deserialize, Serialize};

use super::entry::LocalizedText;

/// How a proposed relationship relates to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    /// Same relationship already recorded.
    Overlaps,
    /// The two facts cannot both hold.
    Contradicts,
    /// The proposal strengthens or weakens an existing fact.
    Extends,
}

impl ConflictKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Overlaps => "overlaps",
            Self::Contradicts => "contradicts",
            Self::Extends => "extends",
        }
    }
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One detected conflict between a proposed relationship and an existing
/// catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictInfo {
    /// ID of the existing entry involved.
    pub existing_id: String,
    /// How the proposal relates to it.
    pub kind: ConflictKind,
    /// Human-readable description of the conflict.
    pub description: LocalizedText,
    /// Confidence of the existing entry, so callers can weigh how
    /// authoritative the conflicting fact is.
    pub existing_confidence: f64,
}
