//! In-memory content loader.

use std::collections::HashMap;

use crate::domain::mail::{ContentKind, ContentLoadError, ContentLoader};

/// A map-backed loader for embedded content and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentLoader {
    entries: HashMap<(ContentKind, String), String>,
}

impl MemoryContentLoader {
    /// An empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, builder style.
    pub fn with(
        mut self,
        kind: ContentKind,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.insert(kind, name, body);

        self
    }

    /// Add an asset.
    pub fn insert(&mut self, kind: ContentKind, name: impl Into<String>, body: impl Into<String>) {
        self.entries.insert((kind, name.into()), body.into());
    }
}

impl ContentLoader for MemoryContentLoader {
    fn load(&self, kind: ContentKind, name: &str) -> Result<String, ContentLoadError> {
        self.entries
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| ContentLoadError::NotFound {
                kind,
                name: name.to_string(),
            })
    }
}
