//! Index structures for fast lookup. Built wholesale from the catalogue
//! and treated as read-only; a catalogue change means a full rebuild.

pub mod component_index;
pub mod doc;
pub mod tag_index;
pub mod token_index;

pub use component_index::ComponentIndex;
pub use doc::{tokenize, EntryDoc};
pub use tag_index::TagIndex;
pub use token_index::TokenIndex;

use std::collections::HashMap;

use crate::catalog::KnowledgeCatalog;

/// The three lookup indexes plus the per-entry extracted documents.
pub struct SearchIndex {
    docs: HashMap<String, EntryDoc>,
    tokens: TokenIndex,
    components: ComponentIndex,
    tags: TagIndex,
}

impl SearchIndex {
    /// Build the full index set from a validated catalogue.
    pub fn build(catalog: &KnowledgeCatalog) -> Self {
        let extracted: Vec<EntryDoc> = catalog.entries().iter().map(EntryDoc::extract).collect();

        let mut tokens = TokenIndex::new();
        tokens.rebuild(&extracted);
        let mut components = ComponentIndex::new();
        components.rebuild(&extracted);
        let mut tags = TagIndex::new();
        tags.rebuild(&extracted);

        log::debug!(
            "search index built: {} entries, {} tokens, {} components, {} tags",
            extracted.len(),
            tokens.len(),
            components.len(),
            tags.len()
        );

        let docs = extracted.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            docs,
            tokens,
            components,
            tags,
        }
    }

    /// Get the extracted document for an entry.
    pub fn doc(&self, id: &str) -> Option<&EntryDoc> {
        self.docs.get(id)
    }

    /// The token index.
    pub fn tokens(&self) -> &TokenIndex {
        &self.tokens
    }

    /// The component index.
    pub fn components(&self) -> &ComponentIndex {
        &self.components
    }

    /// The tag index.
    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
