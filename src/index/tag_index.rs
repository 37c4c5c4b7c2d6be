//! Index by tag — case-insensitive.

use std::collections::{HashMap, HashSet};

use super::doc::EntryDoc;

/// Maps each lower-cased tag to the set of entry IDs carrying it.
pub struct TagIndex {
    index: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    /// Create a new, empty tag index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Get the entry IDs carrying a tag. Lookup is case-insensitive.
    pub fn get(&self, tag: &str) -> Option<&HashSet<String>> {
        self.index.get(&tag.to_lowercase())
    }

    /// Rebuild the entire index from extracted entry docs.
    pub fn rebuild(&mut self, docs: &[EntryDoc]) {
        self.index.clear();
        for doc in docs {
            for tag in &doc.tags {
                self.index
                    .entry(tag.clone())
                    .or_default()
                    .insert(doc.id.clone());
            }
        }
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for TagIndex {
    fn default() -> Self {
        Self::new()
    }
}
