//! Reputation and confidence scoring — pure functions over plain values.
//!
//! Every threshold here is a product-tuned value rather than an
//! algorithmic necessity, so they all live in one place as named
//! constants.

use crate::types::{Contributor, EntryKind, SourceKind};

/// Reputation points per approved contribution.
pub const REPUTATION_APPROVED_WEIGHT: i64 = 10;
/// Reputation points lost per rejected contribution.
pub const REPUTATION_REJECTED_WEIGHT: i64 = 5;
/// Reputation points per upvote received.
pub const REPUTATION_UPVOTE_WEIGHT: i64 = 1;
/// Reputation points lost per downvote received.
pub const REPUTATION_DOWNVOTE_WEIGHT: i64 = 2;
/// Reputation ceiling.
pub const MAX_REPUTATION: i64 = 100;

/// Starting confidence for an unreviewed contribution.
pub const INITIAL_BASE_CONFIDENCE: f64 = 0.3;
/// Reputation-to-confidence conversion divisor.
pub const INITIAL_REPUTATION_DIVISOR: f64 = 1000.0;
/// Cap on the reputation-derived bonus.
pub const INITIAL_REPUTATION_BONUS_CAP: f64 = 0.1;
/// Bonus for citing source URLs.
pub const INITIAL_SOURCE_BONUS: f64 = 0.05;
/// Bonus for firsthand experience.
pub const INITIAL_FIRSTHAND_BONUS: f64 = 0.02;
/// Ceiling applied when the submission contradicts existing knowledge.
pub const CONFLICTED_CONFIDENCE_CAP: f64 = 0.1;
/// Floor for initial confidence.
pub const INITIAL_CONFIDENCE_FLOOR: f64 = 0.05;
/// Ceiling for initial confidence — an unreviewed contribution can never
/// reach established-fact confidence.
pub const INITIAL_CONFIDENCE_CEILING: f64 = 0.5;

/// Confidence an entry starts at once approved.
pub const APPROVED_BASE_CONFIDENCE: f64 = 0.5;
/// Ceiling for approved confidence.
pub const APPROVED_CONFIDENCE_CEILING: f64 = 0.65;

/// Net votes that must be exceeded before votes move confidence.
pub const VOTE_NET_THRESHOLD: i64 = 5;
/// Confidence gained per net vote above the threshold.
pub const VOTE_STEP: f64 = 0.01;
/// Cap on the total vote-driven bonus.
pub const VOTE_BONUS_CAP: f64 = 0.15;
/// Absolute confidence ceiling reachable through voting.
pub const VOTED_CONFIDENCE_CEILING: f64 = 0.8;

/// Reputation at which quick tips may be auto-approved.
pub const TRUSTED_REPUTATION: u32 = 21;
/// Reputation at which relationships and failures join the list.
pub const ESTABLISHED_REPUTATION: u32 = 51;
/// Reputation at which every variant may be auto-approved.
pub const EXPERT_REPUTATION: u32 = 81;

/// Confidence assigned to auto-approved entries, per band.
pub const TRUSTED_AUTO_CONFIDENCE: f64 = 0.35;
pub const ESTABLISHED_AUTO_CONFIDENCE: f64 = 0.45;
pub const EXPERT_AUTO_CONFIDENCE: f64 = 0.55;

/// Contribution history counters feeding the reputation formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReputationInputs {
    pub approved: u32,
    pub rejected: u32,
    pub upvotes: u32,
    pub downvotes: u32,
}

impl From<&Contributor> for ReputationInputs {
    fn from(contributor: &Contributor) -> Self {
        Self {
            approved: contributor.approved_count,
            rejected: contributor.rejected_count,
            upvotes: contributor.upvotes_received,
            downvotes: contributor.downvotes_received,
        }
    }
}

/// Inputs for scoring an unreviewed contribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitialConfidenceInputs {
    pub reputation: u32,
    pub has_source_urls: bool,
    pub is_firsthand: bool,
    pub has_conflicts: bool,
}

/// What a contributor may have approved without review.
#[derive(Debug, Clone, Copy)]
pub struct AutoApprovalLevel {
    pub can_auto_approve: bool,
    /// Entry kinds eligible for auto-approval at this reputation.
    pub allowed_kinds: &'static [EntryKind],
    /// Confidence an auto-approved entry starts at.
    pub confidence: f64,
}

/// Compute a contributor's reputation from their history counters,
/// clamped to `[0, 100]`.
pub fn calculate_reputation(inputs: &ReputationInputs) -> u32 {
    let raw = inputs.approved as i64 * REPUTATION_APPROVED_WEIGHT
        - inputs.rejected as i64 * REPUTATION_REJECTED_WEIGHT
        + inputs.upvotes as i64 * REPUTATION_UPVOTE_WEIGHT
        - inputs.downvotes as i64 * REPUTATION_DOWNVOTE_WEIGHT;
    raw.clamp(0, MAX_REPUTATION) as u32
}

/// Confidence for a freshly submitted, unreviewed contribution.
///
/// Anything contradicting existing knowledge is held at
/// [`CONFLICTED_CONFIDENCE_CAP`] pending human review, regardless of
/// other bonuses.
pub fn calculate_initial_confidence(inputs: &InitialConfidenceInputs) -> f64 {
    let mut confidence = INITIAL_BASE_CONFIDENCE
        + (inputs.reputation as f64 / INITIAL_REPUTATION_DIVISOR).min(INITIAL_REPUTATION_BONUS_CAP);
    if inputs.has_source_urls {
        confidence += INITIAL_SOURCE_BONUS;
    }
    if inputs.is_firsthand {
        confidence += INITIAL_FIRSTHAND_BONUS;
    }
    if inputs.has_conflicts {
        confidence = confidence.min(CONFLICTED_CONFIDENCE_CAP);
    }
    confidence.clamp(INITIAL_CONFIDENCE_FLOOR, INITIAL_CONFIDENCE_CEILING)
}

fn approval_bonus(kind: SourceKind) -> f64 {
    match kind {
        SourceKind::Standards => 0.15,
        SourceKind::Vendor | SourceKind::Academic => 0.10,
        SourceKind::Industry => 0.08,
        SourceKind::VerifiedUser => 0.05,
        SourceKind::CommunityUser => 0.0,
    }
}

/// Confidence for an entry that passed admin review.
///
/// Only the single best cited source counts; sources do not stack.
pub fn calculate_approved_confidence(source_kinds: &[SourceKind]) -> f64 {
    let best = source_kinds
        .iter()
        .map(|kind| approval_bonus(*kind))
        .fold(0.0, f64::max);
    (APPROVED_BASE_CONFIDENCE + best)
        .clamp(APPROVED_BASE_CONFIDENCE, APPROVED_CONFIDENCE_CEILING)
}

/// Adjust confidence for community votes.
///
/// Net votes at or below [`VOTE_NET_THRESHOLD`] leave confidence
/// unchanged — downvotes drive a status transition in the contribution
/// store, not a confidence penalty here.
pub fn apply_vote_adjustment(confidence: f64, upvotes: u32, downvotes: u32) -> f64 {
    let net = upvotes as i64 - downvotes as i64;
    if net <= VOTE_NET_THRESHOLD {
        return confidence;
    }
    let bonus = ((net - VOTE_NET_THRESHOLD) as f64 * VOTE_STEP).min(VOTE_BONUS_CAP);
    (confidence + bonus).min(VOTED_CONFIDENCE_CEILING)
}

const NO_KINDS: &[EntryKind] = &[];
const TRUSTED_KINDS: &[EntryKind] = &[EntryKind::QuickTip];
const ESTABLISHED_KINDS: &[EntryKind] = &[
    EntryKind::QuickTip,
    EntryKind::Relationship,
    EntryKind::Failure,
];
const EXPERT_KINDS: &[EntryKind] = &EntryKind::ALL;

/// What a contributor at the given reputation may have approved without
/// review. Band lower bounds are inclusive.
pub fn auto_approval_level(reputation: u32) -> AutoApprovalLevel {
    if reputation >= EXPERT_REPUTATION {
        AutoApprovalLevel {
            can_auto_approve: true,
            allowed_kinds: EXPERT_KINDS,
            confidence: EXPERT_AUTO_CONFIDENCE,
        }
    } else if reputation >= ESTABLISHED_REPUTATION {
        AutoApprovalLevel {
            can_auto_approve: true,
            allowed_kinds: ESTABLISHED_KINDS,
            confidence: ESTABLISHED_AUTO_CONFIDENCE,
        }
    } else if reputation >= TRUSTED_REPUTATION {
        AutoApprovalLevel {
            can_auto_approve: true,
            allowed_kinds: TRUSTED_KINDS,
            confidence: TRUSTED_AUTO_CONFIDENCE,
        }
    } else {
        AutoApprovalLevel {
            can_auto_approve: false,
            allowed_kinds: NO_KINDS,
            confidence: 0.0,
        }
    }
}
