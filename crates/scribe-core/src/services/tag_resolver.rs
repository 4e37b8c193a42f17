use std::sync::Arc;

use crate::domain::{Tag, TagName};
use crate::error::DomainError;
use crate::ports::TagRepository;

/// Resolves tag names to stored tags, creating missing ones.
pub struct TagResolver<Tx: Send + Sync + 'static> {
    tags: Arc<dyn TagRepository<Tx>>,
}

impl<Tx: Send + Sync + 'static> Clone for TagResolver<Tx> {
    fn clone(&self) -> Self {
        Self {
            tags: Arc::clone(&self.tags),
        }
    }
}

impl<Tx: Send + Sync + 'static> TagResolver<Tx> {
    pub fn new(tags: Arc<dyn TagRepository<Tx>>) -> Self {
        Self { tags }
    }

    /// Resolve every name in order inside `tx`. Stops at the first failure.
    pub async fn resolve_all(&self, tx: &Tx, names: &[TagName]) -> Result<Vec<Tag>, DomainError> {
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let tag = self
                .tags
                .find_or_create_by_name(tx, name)
                .await
                .map_err(|e| e.into_domain("failed to create tag"))?;
            resolved.push(tag);
        }
        Ok(resolved)
    }
}
