//! Per-entry extraction of searchable text.

use std::collections::HashSet;

use crate::types::{EntryKind, KnowledgeEntry, LocalizedText};

/// Tokenize English text: lower-case and split on anything that is not
/// alphanumeric, keeping hyphens so component identifiers like
/// `load-balancer` stay whole.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|t| !t.is_empty())
        .map(|t| t.trim_matches('-').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Everything extracted from one entry at index-build time.
#[derive(Debug, Clone)]
pub struct EntryDoc {
    /// The entry's ID.
    pub id: String,
    /// The entry's variant kind.
    pub kind: EntryKind,
    /// Normalized tokens from every English-language field.
    pub tokens: HashSet<String>,
    /// Raw Japanese text fragments, matched by substring at query time.
    pub native: Vec<String>,
    /// Component types the entry references.
    pub components: HashSet<String>,
    /// Lower-cased tags.
    pub tags: HashSet<String>,
    /// Confidence snapshot used for score boosting.
    pub confidence: f64,
}

fn add_tokens(tokens: &mut HashSet<String>, text: &str) {
    for token in tokenize(text) {
        tokens.insert(token);
    }
}

fn add_localized(tokens: &mut HashSet<String>, native: &mut Vec<String>, text: &LocalizedText) {
    add_tokens(tokens, &text.en);
    if !text.ja.trim().is_empty() {
        native.push(text.ja.clone());
    }
}

impl EntryDoc {
    /// Extract the searchable document for one entry.
    pub fn extract(entry: &KnowledgeEntry) -> Self {
        let mut tokens = HashSet::new();
        let mut native = Vec::new();

        add_tokens(&mut tokens, entry.id());
        for tag in entry.tags() {
            add_tokens(&mut tokens, tag);
        }
        for component in entry.components() {
            add_tokens(&mut tokens, component);
        }

        match entry {
            KnowledgeEntry::Relationship(e) => {
                tokens.insert(e.relation.name().to_string());
                tokens.insert(e.strength.name().to_string());
                tokens.insert(e.direction.name().to_string());
                add_localized(&mut tokens, &mut native, &e.reason);
            }
            KnowledgeEntry::Pattern(e) => {
                add_localized(&mut tokens, &mut native, &e.name);
                add_localized(&mut tokens, &mut native, &e.description);
                add_localized(&mut tokens, &mut native, &e.scalability);
                for optional in &e.optional_components {
                    add_localized(&mut tokens, &mut native, &optional.benefit);
                }
            }
            KnowledgeEntry::AntiPattern(e) => {
                tokens.insert(e.severity.name().to_string());
                add_localized(&mut tokens, &mut native, &e.name);
                add_localized(&mut tokens, &mut native, &e.problem);
                add_localized(&mut tokens, &mut native, &e.impact);
                add_localized(&mut tokens, &mut native, &e.solution);
            }
            KnowledgeEntry::Failure(e) => {
                tokens.insert(e.impact.name().to_string());
                tokens.insert(e.likelihood.name().to_string());
                for item in e.prevention.iter().chain(e.mitigation.iter()) {
                    add_localized(&mut tokens, &mut native, item);
                }
                add_localized(&mut tokens, &mut native, &e.recovery_time);
            }
            KnowledgeEntry::QuickTip(e) => {
                add_tokens(&mut tokens, &e.category);
                add_localized(&mut tokens, &mut native, &e.text);
            }
            KnowledgeEntry::Performance(e) => {
                add_tokens(&mut tokens, &e.latency.low);
                add_tokens(&mut tokens, &e.latency.high);
                add_tokens(&mut tokens, &e.latency.unit);
                add_tokens(&mut tokens, &e.throughput.low);
                add_tokens(&mut tokens, &e.throughput.high);
                add_tokens(&mut tokens, &e.throughput.unit);
                add_localized(&mut tokens, &mut native, &e.scaling);
                for bottleneck in &e.bottlenecks {
                    add_tokens(&mut tokens, bottleneck);
                }
            }
        }

        Self {
            id: entry.id().to_string(),
            kind: entry.kind(),
            tokens,
            native,
            components: entry
                .components()
                .into_iter()
                .map(|c| c.to_string())
                .collect(),
            tags: entry.tags().iter().map(|t| t.to_lowercase()).collect(),
            confidence: entry.trust().confidence,
        }
    }
}
