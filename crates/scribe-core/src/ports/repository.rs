use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostId, PostStatus, Tag, TagName, User, UserId};
use crate::error::RepoError;

/// Generic repository trait for entities stored one row per aggregate.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. `RepoError::Constraint` if it clashes with an
    /// existing one.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, UserId> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Column a post listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A validated page request for one user's posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListQuery {
    pub user_id: UserId,
    pub status: Option<PostStatus>,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub limit: u64,
    pub offset: u64,
}

/// Post store.
///
/// Writes take the transaction handle handed out by the
/// [`TransactionManager`](super::TransactionManager); reads go straight to the
/// store outside any transaction.
#[async_trait]
pub trait PostRepository<Tx: Send + Sync>: Send + Sync {
    /// Insert a new post row.
    async fn create(&self, tx: &Tx, post: &Post) -> Result<(), RepoError>;

    /// Overwrite an existing post row. `RepoError::NotFound` if no row matched.
    async fn update(&self, tx: &Tx, post: &Post) -> Result<(), RepoError>;

    /// Replace all tag links of a post with `tags`, keeping their order.
    async fn set_tags(&self, tx: &Tx, post_id: PostId, tags: &[Tag])
    -> Result<(), RepoError>;

    /// Load a post with its tag names.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Load one page of posts plus the total number of matching posts.
    async fn list(&self, query: &PostListQuery) -> Result<(Vec<Post>, u64), RepoError>;
}

/// Tag store.
#[async_trait]
pub trait TagRepository<Tx: Send + Sync>: Send + Sync {
    /// Return the tag called `name`, creating it if absent.
    ///
    /// Repeated calls with the same name yield the same tag identity.
    async fn find_or_create_by_name(&self, tx: &Tx, name: &TagName) -> Result<Tag, RepoError>;
}
