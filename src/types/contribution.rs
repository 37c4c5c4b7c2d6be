//! User contribution records and their lifecycle states.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::conflict::ConflictInfo;
use super::entry::{EntryKind, KnowledgeEntry};

/// Where a contribution stands in its lifecycle.
///
/// `Pending → {Approved, Rejected}`; a revision request loops back to
/// `Pending`; repeated downvotes can pull an `Approved` contribution into
/// `InReview`, which only a subsequent admin review leaves. `Rejected` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
    InReview,
}

impl ContributionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::InReview => "in_review",
        }
    }
}

impl std::fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An admin reviewer's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    NeedsRevision,
}

/// Direction of a community vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

/// Snapshot of the contributor behind a submission.
///
/// Reputation is never stored here; it is recomputed from these counters
/// on every use so the two can never drift apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contributor {
    pub id: String,
    pub total_contributions: u32,
    pub approved_count: u32,
    pub rejected_count: u32,
    pub upvotes_received: u32,
    pub downvotes_received: u32,
}

impl Contributor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Community vote tally, with voter identities to prevent double-voting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
    pub voters: HashSet<String>,
}

/// A permanent record of one admin review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub reviewer_id: String,
    pub decision: ReviewDecision,
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Everything decided about a contribution so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// Whether structural auto-validation passed.
    pub auto_check_passed: bool,
    /// Human-readable problems found by auto-validation.
    pub auto_check_errors: Vec<String>,
    /// Conflicts detected against the existing catalogue.
    pub conflicts: Vec<ConflictInfo>,
    /// The admin review, retained permanently once recorded.
    pub review: Option<ReviewRecord>,
    /// Community vote tally.
    pub votes: VoteTally,
}

/// A user-submitted knowledge entry candidate.
///
/// Created by `submit`, mutated only by `review` and `vote`, never
/// deleted — rejected contributions are retained for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: String,
    /// The variant the contributor claims to be submitting.
    pub kind: EntryKind,
    pub status: ContributionStatus,
    /// The candidate entry itself.
    pub entry: KnowledgeEntry,
    /// Informal, unverified source notes supplied by the contributor.
    pub user_sources: Vec<String>,
    pub contributor: Contributor,
    pub validation: ValidationRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
