//! Free-text search over the knowledge catalogue.
//!
//! Two-phase design: the index is built once from a validated catalogue
//! and treated as read-only; queries are synchronous scans over the
//! pre-filtered candidate set. Raw scores are normalized per query
//! against the best candidate, so results are always in `[0, 1]`.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::catalog::KnowledgeCatalog;
use crate::index::{tokenize, EntryDoc, SearchIndex};
use crate::types::{AntiPatternEntry, ComponentSpec, EntryKind, KnowledgeEntry};

/// Score per query token exactly matching an indexed token.
const EXACT_TOKEN_SCORE: f64 = 3.0;
/// Score per query token that is a substring (or superstring) of an
/// indexed token.
const PARTIAL_TOKEN_SCORE: f64 = 1.5;
/// Minimum length of both strings before a partial match counts.
const MIN_PARTIAL_LEN: usize = 3;
/// Score per query token exactly matching a tag.
const TAG_MATCH_SCORE: f64 = 2.5;
/// Score when the whole query appears inside a Japanese fragment.
const NATIVE_PHRASE_SCORE: f64 = 4.0;
/// Score per query fragment found inside a Japanese fragment.
const NATIVE_FRAGMENT_SCORE: f64 = 2.0;
/// Confidence boost factor: raw score × (1 + confidence × this).
const CONFIDENCE_BOOST: f64 = 0.3;

/// Weight of a shared component reference in related-entry scoring.
const RELATED_COMPONENT_WEIGHT: f64 = 2.0;
/// Weight of a shared tag in related-entry scoring.
const RELATED_TAG_WEIGHT: f64 = 1.0;

/// Default maximum number of results.
pub const DEFAULT_LIMIT: usize = 10;
/// Default minimum normalized score.
pub const DEFAULT_MIN_SCORE: f64 = 0.1;

/// Options for a free-text query.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Restrict to these entry kinds. Empty = all kinds.
    pub kinds: Vec<EntryKind>,
    /// Restrict to entries referencing any of these component types.
    pub components: Vec<String>,
    /// Restrict to entries carrying any of these tags; intersected with
    /// `components` when both are given.
    pub tags: Vec<String>,
    /// Maximum number of results.
    pub limit: usize,
    /// Minimum normalized score (inclusive).
    pub min_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            kinds: Vec::new(),
            components: Vec::new(),
            tags: Vec::new(),
            limit: DEFAULT_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// One scored result.
#[derive(Debug, Clone)]
pub struct ScoredEntry<'a> {
    pub entry: &'a KnowledgeEntry,
    /// Normalized relevance in `[0, 1]` for free-text queries; raw
    /// confidence for component/tag lookups.
    pub score: f64,
}

/// The search engine: a validated catalogue plus the indexes built over
/// it. Built once and queried many times; a catalogue change means
/// [`SearchEngine::replace_catalog`] or [`SearchEngine::rebuild`].
pub struct SearchEngine {
    catalog: KnowledgeCatalog,
    index: SearchIndex,
}

impl SearchEngine {
    /// Build the engine and its indexes from a validated catalogue.
    pub fn new(catalog: KnowledgeCatalog) -> Self {
        let index = SearchIndex::build(&catalog);
        Self { catalog, index }
    }

    /// The catalogue behind the engine.
    pub fn catalog(&self) -> &KnowledgeCatalog {
        &self.catalog
    }

    /// The built indexes.
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Rebuild the indexes wholesale. There is no incremental path.
    pub fn rebuild(&mut self) {
        self.index = SearchIndex::build(&self.catalog);
    }

    /// Swap in a new catalogue and rebuild.
    pub fn replace_catalog(&mut self, catalog: KnowledgeCatalog) {
        self.catalog = catalog;
        self.rebuild();
    }

    /// Answer a free-text query.
    ///
    /// An empty or whitespace-only query returns nothing, even when
    /// filters would otherwise match everything.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<ScoredEntry<'_>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        let query_tokens = tokenize(trimmed);
        let native_query = trimmed.chars().any(|c| !c.is_ascii());

        // One posting-set lookup per query token; exact matches are then
        // a membership test per candidate.
        let postings: Vec<Option<&HashSet<String>>> = query_tokens
            .iter()
            .map(|token| self.index.tokens().get(token))
            .collect();

        let candidates = self.candidate_ids(options);

        let mut raw: Vec<(&KnowledgeEntry, f64)> = Vec::new();
        for entry in self.catalog.entries() {
            if let Some(ids) = &candidates {
                if !ids.contains(entry.id()) {
                    continue;
                }
            }
            let doc = match self.index.doc(entry.id()) {
                Some(doc) => doc,
                None => continue,
            };
            if !options.kinds.is_empty() && !options.kinds.contains(&doc.kind) {
                continue;
            }
            let score = score_entry(doc, &query_tokens, &postings, trimmed, native_query);
            if score > 0.0 {
                raw.push((entry, score));
            }
        }

        if raw.is_empty() {
            return Vec::new();
        }
        let max = raw.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);

        let mut results: Vec<ScoredEntry<'_>> = raw
            .into_iter()
            .map(|(entry, score)| ScoredEntry {
                entry,
                score: score / max,
            })
            .filter(|r| r.score >= options.min_score)
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(options.limit);
        results
    }

    /// Every entry referencing a component type, highest confidence
    /// first. The score is the entry's confidence, not query relevance.
    pub fn by_component(&self, component: &str) -> Vec<ScoredEntry<'_>> {
        let mut results: Vec<ScoredEntry<'_>> = match self.index.components().get(component) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.catalog.get(id))
                .map(|entry| ScoredEntry {
                    entry,
                    score: entry.trust().confidence,
                })
                .collect(),
            None => Vec::new(),
        };
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results
    }

    /// Every entry carrying a tag (case-insensitive), highest confidence
    /// first.
    pub fn by_tag(&self, tag: &str) -> Vec<ScoredEntry<'_>> {
        let mut results: Vec<ScoredEntry<'_>> = match self.index.tags().get(tag) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.catalog.get(id))
                .map(|entry| ScoredEntry {
                    entry,
                    score: entry.trust().confidence,
                })
                .collect(),
            None => Vec::new(),
        };
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results
    }

    /// Entries related to the given one by shared component references
    /// (weight 2) and shared tags (weight 1), normalized against the
    /// best overlap. The entry itself and zero-overlap entries are
    /// excluded.
    pub fn related(&self, entry_id: &str) -> Vec<ScoredEntry<'_>> {
        let doc = match self.index.doc(entry_id) {
            Some(doc) => doc,
            None => return Vec::new(),
        };

        let mut raw: Vec<(&KnowledgeEntry, f64)> = Vec::new();
        for entry in self.catalog.entries() {
            if entry.id() == entry_id {
                continue;
            }
            let other = match self.index.doc(entry.id()) {
                Some(other) => other,
                None => continue,
            };
            let shared_components = doc.components.intersection(&other.components).count();
            let shared_tags = doc.tags.intersection(&other.tags).count();
            let overlap = shared_components as f64 * RELATED_COMPONENT_WEIGHT
                + shared_tags as f64 * RELATED_TAG_WEIGHT;
            if overlap > 0.0 {
                raw.push((entry, overlap));
            }
        }

        if raw.is_empty() {
            return Vec::new();
        }
        let max = raw.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);

        let mut results: Vec<ScoredEntry<'_>> = raw
            .into_iter()
            .map(|(entry, overlap)| ScoredEntry {
                entry,
                score: overlap / max,
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results
    }

    /// Evaluate every anti-pattern detector against a component spec.
    ///
    /// A detector that reports an error is skipped and logged, so one
    /// bad predicate cannot abort the batch; entries without a detector
    /// are skipped silently. Matches are ordered most severe first, then
    /// by confidence.
    pub fn detect_anti_patterns(&self, spec: &ComponentSpec) -> Vec<&AntiPatternEntry> {
        let mut hits: Vec<&AntiPatternEntry> = Vec::new();
        for entry in self.catalog.entries() {
            let anti_pattern = match entry {
                KnowledgeEntry::AntiPattern(anti_pattern) => anti_pattern,
                _ => continue,
            };
            let detector = match &anti_pattern.detector {
                Some(detector) => detector,
                None => continue,
            };
            match detector.check(spec) {
                Ok(true) => hits.push(anti_pattern),
                Ok(false) => {}
                Err(err) => {
                    log::warn!("anti-pattern detector {} failed: {}", anti_pattern.id, err);
                }
            }
        }
        hits.sort_by(|a, b| {
            a.severity.cmp(&b.severity).then_with(|| {
                b.trust
                    .confidence
                    .partial_cmp(&a.trust.confidence)
                    .unwrap_or(Ordering::Equal)
            })
        });
        hits
    }

    /// Resolve the component/tag pre-filter to a candidate ID set.
    /// `None` means no pre-filter.
    fn candidate_ids(&self, options: &SearchOptions) -> Option<HashSet<String>> {
        let by_component: Option<HashSet<String>> = if options.components.is_empty() {
            None
        } else {
            let mut ids = HashSet::new();
            for component in &options.components {
                if let Some(set) = self.index.components().get(component) {
                    ids.extend(set.iter().cloned());
                }
            }
            Some(ids)
        };

        let by_tag: Option<HashSet<String>> = if options.tags.is_empty() {
            None
        } else {
            let mut ids = HashSet::new();
            for tag in &options.tags {
                if let Some(set) = self.index.tags().get(tag) {
                    ids.extend(set.iter().cloned());
                }
            }
            Some(ids)
        };

        match (by_component, by_tag) {
            (Some(a), Some(b)) => Some(a.intersection(&b).cloned().collect()),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }
}

/// Raw relevance of one entry for a query.
///
/// `postings` holds, per query token, the inverted-index entry set for
/// that token; exact matches are resolved through it.
fn score_entry(
    doc: &EntryDoc,
    query_tokens: &[String],
    postings: &[Option<&HashSet<String>>],
    raw_query: &str,
    native_query: bool,
) -> f64 {
    let mut score = 0.0;

    for (token, posting) in query_tokens.iter().zip(postings) {
        if posting.map_or(false, |ids| ids.contains(&doc.id)) {
            score += EXACT_TOKEN_SCORE;
        } else if token.chars().count() >= MIN_PARTIAL_LEN
            && doc.tokens.iter().any(|indexed| {
                indexed.chars().count() >= MIN_PARTIAL_LEN
                    && (indexed.contains(token.as_str()) || token.contains(indexed.as_str()))
            })
        {
            score += PARTIAL_TOKEN_SCORE;
        }
        if doc.tags.contains(token) {
            score += TAG_MATCH_SCORE;
        }
    }

    if native_query && !doc.native.is_empty() {
        if doc.native.iter().any(|fragment| fragment.contains(raw_query)) {
            score += NATIVE_PHRASE_SCORE;
        } else {
            for part in raw_query.split_whitespace() {
                if doc.native.iter().any(|fragment| fragment.contains(part)) {
                    score += NATIVE_FRAGMENT_SCORE;
                }
            }
        }
    }

    // Higher-trust entries are boosted, but a zero-relevance entry stays
    // at zero.
    if score > 0.0 {
        score *= 1.0 + doc.confidence * CONFIDENCE_BOOST;
    }
    score
}
