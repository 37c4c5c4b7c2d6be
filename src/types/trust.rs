//! Trust and provenance metadata attached to every knowledge entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MAX_CHANGE_HISTORY;

/// The kind of source backing a piece of knowledge.
///
/// Determines the base confidence a fact starts with before any review or
/// voting history is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Standards bodies (NIST, IETF, ISO).
    Standards,
    /// Vendor documentation (AWS, Cloudflare, F5).
    Vendor,
    /// Peer-reviewed academic work.
    Academic,
    /// Industry guides and practitioner references.
    Industry,
    /// User content verified by an administrator.
    VerifiedUser,
    /// Unverified community content.
    CommunityUser,
}

impl SourceKind {
    /// Base confidence for knowledge backed by this kind of source.
    pub fn base_confidence(&self) -> f64 {
        match self {
            Self::Standards => 1.0,
            Self::Academic => 0.9,
            Self::Vendor => 0.85,
            Self::Industry => 0.75,
            Self::VerifiedUser => 0.6,
            Self::CommunityUser => 0.3,
        }
    }

    /// Return a human-readable name for this source kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standards => "standards",
            Self::Vendor => "vendor",
            Self::Academic => "academic",
            Self::Industry => "industry",
            Self::VerifiedUser => "verified-user",
            Self::CommunityUser => "community-user",
        }
    }

    /// Parse a source kind from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standards" => Some(Self::Standards),
            "vendor" => Some(Self::Vendor),
            "academic" => Some(Self::Academic),
            "industry" => Some(Self::Industry),
            "verified-user" => Some(Self::VerifiedUser),
            "community-user" => Some(Self::CommunityUser),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A citation backing a knowledge entry. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSource {
    /// What kind of source this is.
    pub kind: SourceKind,
    /// Title of the document or page.
    pub title: String,
    /// Where the source can be found.
    pub url: Option<String>,
    /// Section or chapter within the source.
    pub section: Option<String>,
    /// When the source was published.
    pub published: Option<DateTime<Utc>>,
    /// When the source was last consulted.
    pub accessed: DateTime<Utc>,
}

/// One recorded modification of an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Who made the change.
    pub changed_by: String,
    /// When the change was made.
    pub changed_at: DateTime<Utc>,
    /// Short description of what changed.
    pub summary: String,
}

/// Lightweight provenance trail for derived or modified entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// IDs of entries this one was derived from.
    pub derived_from: Vec<String>,
    /// Identity of the last modifier.
    pub last_modified_by: Option<String>,
    /// Bounded history of change records, oldest first.
    pub history: Vec<ChangeRecord>,
}

impl Provenance {
    /// Append a change record, dropping the oldest past [`MAX_CHANGE_HISTORY`].
    pub fn record_change(&mut self, record: ChangeRecord) {
        self.last_modified_by = Some(record.changed_by.clone());
        self.history.push(record);
        if self.history.len() > MAX_CHANGE_HISTORY {
            let excess = self.history.len() - MAX_CHANGE_HISTORY;
            self.history.drain(..excess);
        }
    }
}

/// Confidence and citation metadata attached to every knowledge entry.
///
/// Invariants (checked at catalogue load, not per query): `sources` is
/// never empty and `confidence` stays in `[0.0, 1.0]` after every
/// recalculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustMetadata {
    /// How established this fact is (0.0 = unvetted, 1.0 = settled).
    pub confidence: f64,
    /// Citations backing the entry, most authoritative first.
    pub sources: Vec<KnowledgeSource>,
    /// When the entry was last reviewed.
    pub last_reviewed: DateTime<Utc>,
    /// Contributor who submitted the entry, if user-contributed.
    pub contributor_id: Option<String>,
    /// Admin who verified the entry, if verified.
    pub verified_by: Option<String>,
    /// When the entry was verified.
    pub verified_at: Option<DateTime<Utc>>,
    /// Community upvotes received.
    pub upvotes: u32,
    /// Community downvotes received.
    pub downvotes: u32,
    /// Provenance trail, for derived or modified entries.
    pub provenance: Option<Provenance>,
}

impl TrustMetadata {
    /// Trust metadata seeded from citations at the given confidence.
    pub fn new(confidence: f64, sources: Vec<KnowledgeSource>) -> Self {
        Self {
            confidence: confidence.clamp(0.0, 1.0),
            sources,
            last_reviewed: Utc::now(),
            contributor_id: None,
            verified_by: None,
            verified_at: None,
            upvotes: 0,
            downvotes: 0,
            provenance: None,
        }
    }

    /// The kinds of all cited sources, in citation order.
    pub fn source_kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|s| s.kind).collect()
    }
}
