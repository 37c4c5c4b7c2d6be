//! Inverted token index — maps each normalized token to entry IDs.

use std::collections::{HashMap, HashSet};

use super::doc::EntryDoc;

/// Maps each normalized English token to the set of entry IDs containing it.
pub struct TokenIndex {
    index: HashMap<String, HashSet<String>>,
}

impl TokenIndex {
    /// Create a new, empty token index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Get the entry IDs indexed under a token.
    pub fn get(&self, token: &str) -> Option<&HashSet<String>> {
        self.index.get(token)
    }

    /// Rebuild the entire index from extracted entry docs.
    pub fn rebuild(&mut self, docs: &[EntryDoc]) {
        self.index.clear();
        for doc in docs {
            for token in &doc.tokens {
                self.index
                    .entry(token.clone())
                    .or_default()
                    .insert(doc.id.clone());
            }
        }
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for TokenIndex {
    fn default() -> Self {
        Self::new()
    }
}
