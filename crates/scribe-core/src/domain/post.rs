use chrono::{DateTime, Utc};

use super::ids::{PostId, UserId};
use super::status::PostStatus;
use super::value_objects::{PostContent, PostTitle, TagName};
use crate::error::DomainError;

/// Maximum number of tags a post can carry.
pub const MAX_TAGS_PER_POST: usize = 10;

/// Post aggregate - a blog post together with its tag list and status rules.
///
/// Fields are private so every mutation goes through a method that upholds
/// the invariants: unique tags (at most ten), a `first_published_at` that is
/// set once and never cleared, and status changes only along allowed edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: PostId,
    user_id: UserId,
    title: PostTitle,
    content: PostContent,
    status: PostStatus,
    tags: Vec<TagName>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    first_published_at: Option<DateTime<Utc>>,
    content_updated_at: Option<DateTime<Utc>>,
}

/// Stored field values used to rebuild a [`Post`] from persistence.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: PostId,
    pub user_id: UserId,
    pub title: PostTitle,
    pub content: PostContent,
    pub status: PostStatus,
    pub tags: Vec<TagName>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_published_at: Option<DateTime<Utc>>,
    pub content_updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new post with a fresh id.
    ///
    /// Only `draft` and `published` are valid starting states. Creating a
    /// published post stamps `first_published_at` immediately.
    pub fn new(
        user_id: UserId,
        title: PostTitle,
        content: PostContent,
        status: PostStatus,
    ) -> Result<Self, DomainError> {
        if !matches!(status, PostStatus::Draft | PostStatus::Published) {
            return Err(DomainError::invalid(
                "new posts must be created as draft or published",
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: PostId::new(),
            user_id,
            title,
            content,
            status,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            first_published_at: (status == PostStatus::Published).then_some(now),
            content_updated_at: Some(now),
        })
    }

    /// Rebuild a post from stored values, re-checking the tag invariants.
    pub fn restore(record: PostRecord) -> Result<Self, DomainError> {
        let tags = collect_tags(record.tags)?;
        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            content: record.content,
            status: record.status,
            tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
            first_published_at: record.first_published_at,
            content_updated_at: record.content_updated_at,
        })
    }

    /// Hand the field values over for persistence.
    pub fn into_record(self) -> PostRecord {
        PostRecord {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            status: self.status,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
            first_published_at: self.first_published_at,
            content_updated_at: self.content_updated_at,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    pub fn content(&self) -> &PostContent {
        &self.content
    }

    pub fn status(&self) -> PostStatus {
        self.status
    }

    pub fn tags(&self) -> &[TagName] {
        &self.tags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn first_published_at(&self) -> Option<DateTime<Utc>> {
        self.first_published_at
    }

    pub fn content_updated_at(&self) -> Option<DateTime<Utc>> {
        self.content_updated_at
    }

    /// Move the post to `target`.
    ///
    /// Requesting the current status is a no-op. Rejected transitions leave
    /// the post untouched.
    pub fn set_status(&mut self, target: PostStatus) -> Result<(), DomainError> {
        if target == self.status {
            return Ok(());
        }
        self.status.check_transition(target)?;

        let now = Utc::now();
        if target == PostStatus::Published && self.first_published_at.is_none() {
            self.first_published_at = Some(now);
        }
        self.status = target;
        self.content_updated_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Append a tag.
    ///
    /// # Errors
    ///
    /// "tag already exists" for a duplicate, "maximum number of tags reached"
    /// when the post already has ten tags.
    pub fn add_tag(&mut self, name: TagName) -> Result<(), DomainError> {
        push_tag(&mut self.tags, name)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace the whole tag list, applying the same checks as [`Post::add_tag`].
    pub fn replace_tags(&mut self, names: Vec<TagName>) -> Result<(), DomainError> {
        let tags = collect_tags(names)?;
        if tags != self.tags {
            self.tags = tags;
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn set_title(&mut self, title: PostTitle) {
        if title != self.title {
            self.title = title;
            self.updated_at = Utc::now();
        }
    }

    /// Replace the body. Refreshes `content_updated_at` when it actually changes.
    pub fn set_content(&mut self, content: PostContent) {
        if content != self.content {
            let now = Utc::now();
            self.content = content;
            self.content_updated_at = Some(now);
            self.updated_at = now;
        }
    }
}

fn push_tag(tags: &mut Vec<TagName>, name: TagName) -> Result<(), DomainError> {
    if tags.contains(&name) {
        return Err(DomainError::invalid("tag already exists"));
    }
    if tags.len() >= MAX_TAGS_PER_POST {
        return Err(DomainError::invalid("maximum number of tags reached"));
    }
    tags.push(name);
    Ok(())
}

fn collect_tags(names: Vec<TagName>) -> Result<Vec<TagName>, DomainError> {
    let mut tags = Vec::with_capacity(names.len().min(MAX_TAGS_PER_POST));
    for name in names {
        push_tag(&mut tags, name)?;
    }
    Ok(tags)
}
