use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::TagId;
use super::value_objects::TagName;

/// Tag entity - a shared label posts link to by name.
///
/// Created lazily the first time a post references an unseen name and never
/// deleted by the post workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new tag with generated ID and timestamps.
    pub fn new(name: TagName) -> Self {
        let now = Utc::now();
        Self {
            id: TagId::new(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}
