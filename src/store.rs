//! User contribution registry — the submission, review, and voting
//! lifecycle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::engine::trust::{
    auto_approval_level, calculate_approved_confidence, calculate_initial_confidence,
    calculate_reputation, InitialConfidenceInputs, ReputationInputs,
};
use crate::types::{
    ConflictInfo, Contribution, ContributionStatus, Contributor, EntryKind, KnowledgeEntry,
    ReviewDecision, ReviewRecord, ValidationRecord, VoteDirection, VoteTally,
};

/// Downvotes at which an approved contribution is pulled back for
/// review. This is the only automatic demotion path; upvotes never
/// auto-promote.
pub const REVIEW_DOWNVOTE_THRESHOLD: u32 = 3;

/// Input for a new contribution.
#[derive(Debug, Clone)]
pub struct SubmitInput {
    /// The variant the contributor claims to be submitting.
    pub kind: EntryKind,
    /// The candidate entry.
    pub entry: KnowledgeEntry,
    /// Informal, unverified source notes.
    pub user_sources: Vec<String>,
    /// Snapshot of the contributor's history.
    pub contributor: Contributor,
    /// Whether the contributor marks this as firsthand experience.
    pub is_firsthand: bool,
    /// Conflicts already detected against the catalogue (the caller runs
    /// the conflict detector for relationship submissions).
    pub conflicts: Vec<ConflictInfo>,
}

/// Input for an admin review.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub reviewer_id: String,
    pub decision: ReviewDecision,
    pub comment: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Filters for listing contributions.
#[derive(Debug, Clone, Default)]
pub struct ContributionFilter {
    pub status: Option<ContributionStatus>,
    pub kind: Option<EntryKind>,
    pub contributor_id: Option<String>,
}

/// In-memory contribution registry.
///
/// Mutating operations take `&mut self`, so a single owner gets the
/// required single-writer discipline for free; an embedder sharing the
/// store across threads wraps it in a `Mutex`, which also makes the
/// increment-then-threshold check in [`ContributionStore::vote`] atomic.
/// Contributions are never deleted — rejected ones are retained for
/// audit.
pub struct ContributionStore {
    contributions: HashMap<String, Contribution>,
    /// Submission order, for stable listings.
    order: Vec<String>,
    next_seq: u64,
}

impl ContributionStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            contributions: HashMap::new(),
            order: Vec::new(),
            next_seq: 1,
        }
    }

    /// Register a submission.
    ///
    /// Always produces a record: structural problems are reported in the
    /// validation record rather than aborting the call, so an admin can
    /// still override a failed auto-check. A quick tip from a
    /// sufficiently reputable contributor that passes the auto-check is
    /// approved immediately; everything else starts pending.
    pub fn submit(&mut self, input: SubmitInput) -> Contribution {
        let id = format!("contrib-{:06}", self.next_seq);
        self.next_seq += 1;

        let mut entry = input.entry;
        let errors = auto_check(input.kind, &entry);
        let passed = errors.is_empty();

        let reputation = calculate_reputation(&ReputationInputs::from(&input.contributor));
        let level = auto_approval_level(reputation);
        let auto_approved = passed
            && input.kind == EntryKind::QuickTip
            && level.can_auto_approve
            && level.allowed_kinds.contains(&EntryKind::QuickTip);

        let status = if auto_approved {
            ContributionStatus::Approved
        } else {
            ContributionStatus::Pending
        };
        let confidence = if auto_approved {
            level.confidence
        } else {
            calculate_initial_confidence(&InitialConfidenceInputs {
                reputation,
                has_source_urls: !input.user_sources.is_empty(),
                is_firsthand: input.is_firsthand,
                has_conflicts: !input.conflicts.is_empty(),
            })
        };

        {
            let trust = entry.trust_mut();
            trust.confidence = confidence;
            trust.contributor_id = Some(input.contributor.id.clone());
        }

        let now = Utc::now();
        let contribution = Contribution {
            id: id.clone(),
            kind: input.kind,
            status,
            entry,
            user_sources: input.user_sources,
            contributor: input.contributor,
            validation: ValidationRecord {
                auto_check_passed: passed,
                auto_check_errors: errors,
                conflicts: input.conflicts,
                review: None,
                votes: VoteTally::default(),
            },
            created_at: now,
            updated_at: now,
        };

        log::debug!("contribution {} submitted as {}", id, status);
        self.order.push(id.clone());
        self.contributions.insert(id, contribution.clone());
        contribution
    }

    /// Apply an admin review. Returns `None` for an unknown ID.
    ///
    /// The review record is retained permanently on the contribution,
    /// even across later status changes.
    pub fn review(&mut self, id: &str, input: ReviewInput) -> Option<Contribution> {
        let contribution = self.contributions.get_mut(id)?;

        match input.decision {
            ReviewDecision::Approved => {
                contribution.status = ContributionStatus::Approved;
                let kinds = contribution.entry.trust().source_kinds();
                let trust = contribution.entry.trust_mut();
                trust.confidence = calculate_approved_confidence(&kinds);
                trust.verified_by = Some(input.reviewer_id.clone());
                trust.verified_at = Some(input.reviewed_at);
                trust.last_reviewed = input.reviewed_at;
            }
            ReviewDecision::Rejected => {
                contribution.status = ContributionStatus::Rejected;
            }
            ReviewDecision::NeedsRevision => {
                // The contributor is expected to resubmit.
                contribution.status = ContributionStatus::Pending;
            }
        }

        contribution.validation.review = Some(ReviewRecord {
            reviewer_id: input.reviewer_id,
            decision: input.decision,
            comment: input.comment,
            reviewed_at: input.reviewed_at,
        });
        contribution.updated_at = Utc::now();

        log::debug!("contribution {} reviewed: {}", id, contribution.status);
        Some(contribution.clone())
    }

    /// Record a community vote. Returns `false` for an unknown ID or a
    /// repeat vote from the same voter, without mutating anything.
    ///
    /// The demotion check runs against the tally just incremented, so an
    /// approved contribution moves to in-review exactly when the
    /// threshold is reached.
    pub fn vote(&mut self, id: &str, voter_id: &str, direction: VoteDirection) -> bool {
        let contribution = match self.contributions.get_mut(id) {
            Some(contribution) => contribution,
            None => return false,
        };

        let votes = &mut contribution.validation.votes;
        if !votes.voters.insert(voter_id.to_string()) {
            return false;
        }
        match direction {
            VoteDirection::Up => votes.upvotes += 1,
            VoteDirection::Down => votes.downvotes += 1,
        }
        let (upvotes, downvotes) = (votes.upvotes, votes.downvotes);

        let trust = contribution.entry.trust_mut();
        trust.upvotes = upvotes;
        trust.downvotes = downvotes;

        if contribution.status == ContributionStatus::Approved
            && downvotes >= REVIEW_DOWNVOTE_THRESHOLD
        {
            contribution.status = ContributionStatus::InReview;
            log::debug!(
                "contribution {} pulled back for review after {} downvotes",
                id,
                downvotes
            );
        }
        contribution.updated_at = Utc::now();
        true
    }

    /// Get a contribution by ID.
    pub fn get(&self, id: &str) -> Option<&Contribution> {
        self.contributions.get(id)
    }

    /// List contributions in submission order, optionally filtered.
    pub fn all(&self, filter: &ContributionFilter) -> Vec<&Contribution> {
        self.order
            .iter()
            .filter_map(|id| self.contributions.get(id))
            .filter(|c| filter.status.map_or(true, |s| c.status == s))
            .filter(|c| filter.kind.map_or(true, |k| c.kind == k))
            .filter(|c| {
                filter
                    .contributor_id
                    .as_deref()
                    .map_or(true, |id| c.contributor.id == id)
            })
            .collect()
    }

    /// The pending-review queue, in submission order.
    pub fn pending_queue(&self) -> Vec<&Contribution> {
        self.all(&ContributionFilter {
            status: Some(ContributionStatus::Pending),
            ..Default::default()
        })
    }

    /// Number of contributions ever submitted.
    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

impl Default for ContributionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural auto-validation of a submitted entry. Returns
/// human-readable problems; an empty list means the check passed.
fn auto_check(kind: EntryKind, entry: &KnowledgeEntry) -> Vec<String> {
    let mut errors = Vec::new();
    if entry.id().trim().is_empty() {
        errors.push("entry ID is missing".to_string());
    }
    if entry.tags().is_empty() {
        errors.push("entry must carry at least one tag".to_string());
    }
    let trust = entry.trust();
    if trust.sources.is_empty() {
        errors.push("trust metadata must cite at least one source".to_string());
    }
    if !(0.0..=1.0).contains(&trust.confidence) {
        errors.push(format!(
            "confidence {} is outside [0, 1]",
            trust.confidence
        ));
    }
    if entry.kind() != kind {
        errors.push(format!(
            "declared kind '{}' does not match entry variant '{}'",
            kind,
            entry.kind()
        ));
    }
    errors
}
