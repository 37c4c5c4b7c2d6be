//! ArchKnowledge — in-memory knowledge engine for infrastructure-
//! architecture advice.
//!
//! Holds a validated catalogue of typed facts (component relationships,
//! design patterns, anti-patterns, failure scenarios, quick tips,
//! performance profiles), each carrying trust metadata, and answers
//! free-text, component, and tag queries against it. User-submitted
//! facts flow through a contribution store that recomputes contributor
//! reputation, records conflicts with existing relationships, and walks
//! a submit → review → vote lifecycle.

pub mod catalog;
pub mod engine;
pub mod index;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use catalog::KnowledgeCatalog;
pub use engine::{
    apply_vote_adjustment, are_contradictory, auto_approval_level,
    calculate_approved_confidence, calculate_initial_confidence, calculate_reputation,
    detect_catalog_conflicts, detect_relationship_conflicts, is_extension, AutoApprovalLevel,
    InitialConfidenceInputs, ReputationInputs, ScoredEntry, SearchEngine, SearchOptions,
};
pub use index::SearchIndex;
pub use store::{
    ContributionFilter, ContributionStore, ReviewInput, SubmitInput, REVIEW_DOWNVOTE_THRESHOLD,
};
pub use types::{
    AntiPatternEntry, ComponentRequirement, ComponentSpec, ConflictInfo, ConflictKind,
    Contribution, ContributionStatus, Contributor, Detector, EntryKind, FailureEntry,
    FailureImpact, KbError, KbResult, KnowledgeEntry, KnowledgeSource, Likelihood, LocalizedText,
    OptionalComponent, PatternEntry, PerformanceEntry, QuickTipEntry, RangeText,
    RelationDirection, RelationKind, RelationStrength, RelationshipEntry, ReviewDecision,
    Severity, SourceKind, TrustMetadata, VoteDirection,
};
