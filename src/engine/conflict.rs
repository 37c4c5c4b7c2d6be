//! Pairwise conflict classification for relationship facts.

use crate::catalog::KnowledgeCatalog;
use crate::types::{ConflictInfo, ConflictKind, LocalizedText, RelationKind, RelationshipEntry};

/// Whether two relation kinds cannot both hold for the same component
/// pair. `conflicts` contradicts every *other* kind; a kind never
/// contradicts itself. Symmetric.
pub fn are_contradictory(a: RelationKind, b: RelationKind) -> bool {
    a != b && (a == RelationKind::Conflicts || b == RelationKind::Conflicts)
}

/// Whether `new_kind` extends `existing_kind` — directional: only
/// `recommends` extends `requires`, and `enhances` extends `recommends`.
pub fn is_extension(new_kind: RelationKind, existing_kind: RelationKind) -> bool {
    matches!(
        (new_kind, existing_kind),
        (RelationKind::Recommends, RelationKind::Requires)
            | (RelationKind::Enhances, RelationKind::Recommends)
    )
}

/// A relationship and its reverse describe the same component pair.
fn same_slot(a: &RelationshipEntry, b: &RelationshipEntry) -> bool {
    (a.source == b.source && a.target == b.target)
        || (a.source == b.target && a.target == b.source)
}

/// Classify a proposed relationship against a set of existing ones.
///
/// Every existing relationship over the same component pair (in either
/// order) is checked: identical relation kinds overlap, contradictory
/// kinds contradict, and an extension pair extends. Anything else is not
/// a conflict.
pub fn detect_relationship_conflicts<'a, I>(
    candidate: &RelationshipEntry,
    existing: I,
) -> Vec<ConflictInfo>
where
    I: IntoIterator<Item = &'a RelationshipEntry>,
{
    let mut conflicts = Vec::new();
    for other in existing {
        if !same_slot(candidate, other) {
            continue;
        }
        let kind = if candidate.relation == other.relation {
            ConflictKind::Overlaps
        } else if are_contradictory(candidate.relation, other.relation) {
            ConflictKind::Contradicts
        } else if is_extension(candidate.relation, other.relation) {
            ConflictKind::Extends
        } else {
            continue;
        };
        conflicts.push(ConflictInfo {
            existing_id: other.id.clone(),
            kind,
            description: describe(kind, other),
            existing_confidence: other.trust.confidence,
        });
    }
    conflicts
}

/// Classify a proposed relationship against the full catalogue.
pub fn detect_catalog_conflicts(
    candidate: &RelationshipEntry,
    catalog: &KnowledgeCatalog,
) -> Vec<ConflictInfo> {
    detect_relationship_conflicts(candidate, catalog.relationships())
}

fn describe(kind: ConflictKind, existing: &RelationshipEntry) -> LocalizedText {
    match kind {
        ConflictKind::Overlaps => LocalizedText::new(
            format!(
                "Duplicates the existing '{}' relationship between {} and {}",
                existing.relation, existing.source, existing.target
            ),
            format!(
                "{}と{}の既存の「{}」関係と重複しています",
                existing.source,
                existing.target,
                existing.relation.name()
            ),
        ),
        ConflictKind::Contradicts => LocalizedText::new(
            format!(
                "Contradicts the existing '{}' relationship between {} and {}",
                existing.relation, existing.source, existing.target
            ),
            format!(
                "{}と{}の既存の「{}」関係と矛盾しています",
                existing.source,
                existing.target,
                existing.relation.name()
            ),
        ),
        ConflictKind::Extends => LocalizedText::new(
            format!(
                "Extends the existing '{}' relationship between {} and {}",
                existing.relation, existing.source, existing.target
            ),
            format!(
                "{}と{}の既存の「{}」関係を拡張しています",
                existing.source,
                existing.target,
                existing.relation.name()
            ),
        ),
    }
}
