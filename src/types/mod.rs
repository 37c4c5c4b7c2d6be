//! All data types for the knowledge engine.

pub mod conflict;
pub mod contribution;
pub mod entry;
pub mod error;
pub mod trust;

pub use conflict::{ConflictInfo, ConflictKind};
pub use contribution::{
    Contribution, ContributionStatus, Contributor, ReviewDecision, ReviewRecord, ValidationRecord,
    VoteDirection, VoteTally,
};
pub use entry::{
    AntiPatternEntry, ComponentRequirement, ComponentSpec, Detector, EntryKind, FailureEntry,
    FailureImpact, KnowledgeEntry, Likelihood, LocalizedText, OptionalComponent, PatternEntry,
    PerformanceEntry, QuickTipEntry, RangeText, RelationDirection, RelationKind, RelationStrength,
    RelationshipEntry, Severity,
};
pub use error::{KbError, KbResult};
pub use trust::{ChangeRecord, KnowledgeSource, Provenance, SourceKind, TrustMetadata};

/// Maximum change records retained in a provenance trail.
pub const MAX_CHANGE_HISTORY: usize = 10;

/// Minimum items required in a failure scenario's prevention and
/// mitigation lists.
pub const MIN_FAILURE_GUIDANCE: usize = 2;
