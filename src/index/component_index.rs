//! Index by component type — maps each component to the entries that
//! reference it.

use std::collections::{HashMap, HashSet};

use super::doc::EntryDoc;

/// Maps each component type to the set of entry IDs referencing it.
pub struct ComponentIndex {
    index: HashMap<String, HashSet<String>>,
}

impl ComponentIndex {
    /// Create a new, empty component index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Get the entry IDs referencing a component type.
    pub fn get(&self, component: &str) -> Option<&HashSet<String>> {
        self.index.get(component)
    }

    /// Rebuild the entire index from extracted entry docs.
    pub fn rebuild(&mut self, docs: &[EntryDoc]) {
        self.index.clear();
        for doc in docs {
            for component in &doc.components {
                self.index
                    .entry(component.clone())
                    .or_default()
                    .insert(doc.id.clone());
            }
        }
    }

    /// Number of indexed component types.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for ComponentIndex {
    fn default() -> Self {
        Self::new()
    }
}
