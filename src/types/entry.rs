//! Knowledge entry variants and the shared entry sum type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::KbResult;
use super::trust::TrustMetadata;

/// A short bilingual text value. English fields are tokenized for search;
/// Japanese fields are matched by raw substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub ja: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ja: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ja: ja.into(),
        }
    }
}

/// The variant of a knowledge entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// A typed relationship between two component types.
    Relationship,
    /// A named design pattern over component types.
    Pattern,
    /// A design mistake with a detection predicate.
    AntiPattern,
    /// A failure scenario with prevention and mitigation guidance.
    Failure,
    /// A short piece of practical advice for one component.
    QuickTip,
    /// Latency/throughput characteristics of one component.
    Performance,
}

impl EntryKind {
    /// All entry kinds, in catalogue order.
    pub const ALL: [EntryKind; 6] = [
        Self::Relationship,
        Self::Pattern,
        Self::AntiPattern,
        Self::Failure,
        Self::QuickTip,
        Self::Performance,
    ];

    /// Return a human-readable name for this entry kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relationship => "relationship",
            Self::Pattern => "pattern",
            Self::AntiPattern => "anti-pattern",
            Self::Failure => "failure",
            Self::QuickTip => "tip",
            Self::Performance => "performance",
        }
    }

    /// Parse an entry kind from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "relationship" => Some(Self::Relationship),
            "pattern" => Some(Self::Pattern),
            "anti-pattern" => Some(Self::AntiPattern),
            "failure" => Some(Self::Failure),
            "tip" => Some(Self::QuickTip),
            "performance" => Some(Self::Performance),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How one component type relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    Requires,
    Recommends,
    Conflicts,
    Enhances,
    Protects,
}

impl RelationKind {
    /// Return a human-readable name for this relation kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Requires => "requires",
            Self::Recommends => "recommends",
            Self::Conflicts => "conflicts",
            Self::Enhances => "enhances",
            Self::Protects => "protects",
        }
    }

    /// Parse a relation kind from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "requires" => Some(Self::Requires),
            "recommends" => Some(Self::Recommends),
            "conflicts" => Some(Self::Conflicts),
            "enhances" => Some(Self::Enhances),
            "protects" => Some(Self::Protects),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How binding a relationship is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationStrength {
    Mandatory,
    Strong,
    Weak,
}

impl RelationStrength {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mandatory => "mandatory",
            Self::Strong => "strong",
            Self::Weak => "weak",
        }
    }
}

impl std::fmt::Display for RelationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which way a relationship points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationDirection {
    Upstream,
    Downstream,
    Bidirectional,
}

impl RelationDirection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Downstream => "downstream",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl std::fmt::Display for RelationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Severity of an anti-pattern. Ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a failure scenario costs when it hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureImpact {
    ServiceDown,
    Degraded,
    DataLoss,
    SecurityBreach,
}

impl FailureImpact {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ServiceDown => "service-down",
            Self::Degraded => "degraded",
            Self::DataLoss => "data-loss",
            Self::SecurityBreach => "security-breach",
        }
    }
}

impl std::fmt::Display for FailureImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How likely a failure scenario is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Likelihood {
    High,
    Medium,
    Low,
}

impl Likelihood {
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One component of a candidate architecture, as seen by anti-pattern
/// detectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// The component type identifier (e.g. `web-server`).
    pub component: String,
    /// How many instances the architecture places.
    pub count: u32,
    /// Component types attached to this one.
    pub attached: Vec<String>,
}

/// A fallible anti-pattern predicate evaluated against one component spec.
///
/// Detectors are attached at runtime and are not serialized with the
/// entry. A detector that returns `Err` is isolated by the caller so one
/// bad predicate cannot abort a batch evaluation.
#[derive(Clone)]
pub struct Detector(Arc<dyn Fn(&ComponentSpec) -> KbResult<bool> + Send + Sync>);

impl Detector {
    pub fn new(f: impl Fn(&ComponentSpec) -> KbResult<bool> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluate the predicate against a component spec.
    pub fn check(&self, spec: &ComponentSpec) -> KbResult<bool> {
        (self.0)(spec)
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Detector(..)")
    }
}

/// A required component of a pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRequirement {
    /// The component type required.
    pub component: String,
    /// Minimum instance count.
    pub min_count: u32,
}

/// An optional component of a pattern and what it buys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionalComponent {
    /// The component type.
    pub component: String,
    /// What adding it improves.
    pub benefit: LocalizedText,
}

/// Free-text bounds of a measured range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeText {
    pub low: String,
    pub high: String,
    pub unit: String,
}

/// A typed relationship between two component types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipEntry {
    pub id: String,
    pub tags: Vec<String>,
    pub trust: TrustMetadata,
    /// The component type the relationship starts from.
    pub source: String,
    /// The component type the relationship points at.
    pub target: String,
    pub relation: RelationKind,
    pub strength: RelationStrength,
    pub direction: RelationDirection,
    /// Why the relationship holds.
    pub reason: LocalizedText,
}

/// A named design pattern over component types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternEntry {
    pub id: String,
    pub tags: Vec<String>,
    pub trust: TrustMetadata,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub required_components: Vec<ComponentRequirement>,
    pub optional_components: Vec<OptionalComponent>,
    /// How the pattern scales under load.
    pub scalability: LocalizedText,
    /// Implementation complexity, 1 (trivial) to 5 (hard).
    pub complexity: u8,
    /// IDs of patterns this one grows into.
    pub evolves_to: Vec<String>,
    /// IDs of patterns this one grew out of.
    pub evolves_from: Vec<String>,
}

/// A design mistake, with an optional runtime detection predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiPatternEntry {
    pub id: String,
    pub tags: Vec<String>,
    pub trust: TrustMetadata,
    pub name: LocalizedText,
    pub severity: Severity,
    pub problem: LocalizedText,
    pub impact: LocalizedText,
    pub solution: LocalizedText,
    /// Attached at runtime; not part of the serialized catalogue feed.
    #[serde(skip)]
    pub detector: Option<Detector>,
}

/// A failure scenario with prevention and mitigation guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    pub id: String,
    pub tags: Vec<String>,
    pub trust: TrustMetadata,
    /// The component that fails.
    pub component: String,
    /// Other components dragged down by the failure.
    pub affected_components: Vec<String>,
    pub impact: FailureImpact,
    pub likelihood: Likelihood,
    /// Measures that keep the failure from happening. At least two.
    pub prevention: Vec<LocalizedText>,
    /// Measures that limit the damage once it happens. At least two.
    pub mitigation: Vec<LocalizedText>,
    /// Rough time to recover, as prose.
    pub recovery_time: LocalizedText,
}

/// A short piece of practical advice for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickTipEntry {
    pub id: String,
    pub tags: Vec<String>,
    pub trust: TrustMetadata,
    pub component: String,
    pub category: String,
    pub text: LocalizedText,
}

/// Latency/throughput characteristics of one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub id: String,
    pub tags: Vec<String>,
    pub trust: TrustMetadata,
    pub component: String,
    pub latency: RangeText,
    pub throughput: RangeText,
    /// How the component is usually scaled.
    pub scaling: LocalizedText,
    /// Signals that the component is the bottleneck.
    pub bottlenecks: Vec<String>,
}

/// One fact in the knowledge catalogue.
///
/// The variants diverge structurally, so the catalogue is a sum type
/// rather than a struct of optionals; every consumer matches
/// exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum KnowledgeEntry {
    Relationship(RelationshipEntry),
    Pattern(PatternEntry),
    AntiPattern(AntiPatternEntry),
    Failure(FailureEntry),
    QuickTip(QuickTipEntry),
    Performance(PerformanceEntry),
}

impl KnowledgeEntry {
    /// The entry's unique ID.
    pub fn id(&self) -> &str {
        match self {
            Self::Relationship(e) => &e.id,
            Self::Pattern(e) => &e.id,
            Self::AntiPattern(e) => &e.id,
            Self::Failure(e) => &e.id,
            Self::QuickTip(e) => &e.id,
            Self::Performance(e) => &e.id,
        }
    }

    /// The entry's variant kind.
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Relationship(_) => EntryKind::Relationship,
            Self::Pattern(_) => EntryKind::Pattern,
            Self::AntiPattern(_) => EntryKind::AntiPattern,
            Self::Failure(_) => EntryKind::Failure,
            Self::QuickTip(_) => EntryKind::QuickTip,
            Self::Performance(_) => EntryKind::Performance,
        }
    }

    /// The entry's tags.
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Relationship(e) => &e.tags,
            Self::Pattern(e) => &e.tags,
            Self::AntiPattern(e) => &e.tags,
            Self::Failure(e) => &e.tags,
            Self::QuickTip(e) => &e.tags,
            Self::Performance(e) => &e.tags,
        }
    }

    /// The entry's trust metadata.
    pub fn trust(&self) -> &TrustMetadata {
        match self {
            Self::Relationship(e) => &e.trust,
            Self::Pattern(e) => &e.trust,
            Self::AntiPattern(e) => &e.trust,
            Self::Failure(e) => &e.trust,
            Self::QuickTip(e) => &e.trust,
            Self::Performance(e) => &e.trust,
        }
    }

    /// Mutable access to the entry's trust metadata.
    pub fn trust_mut(&mut self) -> &mut TrustMetadata {
        match self {
            Self::Relationship(e) => &mut e.trust,
            Self::Pattern(e) => &mut e.trust,
            Self::AntiPattern(e) => &mut e.trust,
            Self::Failure(e) => &mut e.trust,
            Self::QuickTip(e) => &mut e.trust,
            Self::Performance(e) => &mut e.trust,
        }
    }

    /// Every component type the entry references.
    pub fn components(&self) -> Vec<&str> {
        match self {
            Self::Relationship(e) => vec![e.source.as_str(), e.target.as_str()],
            Self::Pattern(e) => {
                let mut out: Vec<&str> = e
                    .required_components
                    .iter()
                    .map(|r| r.component.as_str())
                    .collect();
                out.extend(e.optional_components.iter().map(|o| o.component.as_str()));
                out
            }
            Self::AntiPattern(_) => Vec::new(),
            Self::Failure(e) => {
                let mut out = vec![e.component.as_str()];
                out.extend(e.affected_components.iter().map(|c| c.as_str()));
                out
            }
            Self::QuickTip(e) => vec![e.component.as_str()],
            Self::Performance(e) => vec![e.component.as_str()],
        }
    }
}
