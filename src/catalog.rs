//! Validated knowledge catalogue — the read-only entry set behind the
//! search engine.

use std::collections::{HashMap, HashSet};

use crate::types::{
    KbError, KbResult, KnowledgeEntry, RelationshipEntry, MIN_FAILURE_GUIDANCE,
};

/// The full set of knowledge entries, validated at load time.
///
/// Referential invariants (unique IDs, resolvable component and evolution
/// references, well-formed trust metadata) are checked once here; the
/// search engine and contribution store trust a constructed catalogue and
/// never re-verify them per query.
pub struct KnowledgeCatalog {
    entries: Vec<KnowledgeEntry>,
    by_id: HashMap<String, usize>,
    component_types: HashSet<String>,
}

impl KnowledgeCatalog {
    /// Validate a catalogue feed against the known component types.
    ///
    /// Fails on the first violation: empty or duplicate entry ID, empty
    /// tag set, empty source list, confidence outside `[0, 1]`, pattern
    /// complexity outside `[1, 5]`, an unknown component reference, an
    /// evolution edge that does not resolve to a pattern entry, or a
    /// failure scenario with too little guidance.
    pub fn new(
        entries: Vec<KnowledgeEntry>,
        component_types: HashSet<String>,
    ) -> KbResult<Self> {
        let mut by_id = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            let id = entry.id();
            if id.trim().is_empty() {
                return Err(KbError::EmptyEntryId);
            }
            if by_id.insert(id.to_string(), idx).is_some() {
                return Err(KbError::DuplicateEntryId(id.to_string()));
            }
            if entry.tags().is_empty() {
                return Err(KbError::EmptyTags(id.to_string()));
            }

            let trust = entry.trust();
            if trust.sources.is_empty() {
                return Err(KbError::EmptySources(id.to_string()));
            }
            if !(0.0..=1.0).contains(&trust.confidence) {
                return Err(KbError::InvalidConfidence {
                    id: id.to_string(),
                    value: trust.confidence,
                });
            }

            for component in entry.components() {
                if !component_types.contains(component) {
                    return Err(KbError::UnknownComponent {
                        id: id.to_string(),
                        component: component.to_string(),
                    });
                }
            }

            match entry {
                KnowledgeEntry::Pattern(p) => {
                    if !(1..=5).contains(&p.complexity) {
                        return Err(KbError::InvalidComplexity {
                            id: id.to_string(),
                            value: p.complexity,
                        });
                    }
                }
                KnowledgeEntry::Failure(f) => {
                    if f.prevention.len() < MIN_FAILURE_GUIDANCE {
                        return Err(KbError::TooFewGuidanceItems {
                            id: id.to_string(),
                            field: "prevention",
                            min: MIN_FAILURE_GUIDANCE,
                        });
                    }
                    if f.mitigation.len() < MIN_FAILURE_GUIDANCE {
                        return Err(KbError::TooFewGuidanceItems {
                            id: id.to_string(),
                            field: "mitigation",
                            min: MIN_FAILURE_GUIDANCE,
                        });
                    }
                }
                _ => {}
            }
        }

        // Evolution edges can point forward, so resolve them after every
        // ID is known.
        for entry in &entries {
            if let KnowledgeEntry::Pattern(p) = entry {
                for target in p.evolves_to.iter().chain(p.evolves_from.iter()) {
                    let resolved = by_id
                        .get(target)
                        .map(|&i| matches!(entries[i], KnowledgeEntry::Pattern(_)))
                        .unwrap_or(false);
                    if !resolved {
                        return Err(KbError::UnresolvedEvolution {
                            id: p.id.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            entries,
            by_id,
            component_types,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by ID.
    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// All entries, in feed order.
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// The component types this catalogue was validated against.
    pub fn component_types(&self) -> &HashSet<String> {
        &self.component_types
    }

    /// All relationship entries, in feed order.
    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipEntry> {
        self.entries.iter().filter_map(|e| match e {
            KnowledgeEntry::Relationship(r) => Some(r),
            _ => None,
        })
    }
}

impl std::fmt::Debug for KnowledgeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeCatalog")
            .field("entries", &self.entries.len())
            .field("component_types", &self.component_types.len())
            .finish()
    }
}
