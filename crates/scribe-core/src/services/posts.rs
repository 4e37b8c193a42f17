//! Post use cases: create, update, patch, get, list.
//!
//! Input is validated into value objects before any store is touched. Writes
//! run inside one transaction; reads go straight to the post store.

use std::sync::Arc;

use async_trait::async_trait;

use super::tag_resolver::TagResolver;
use crate::domain::{Post, PostContent, PostId, PostStatus, PostTitle, TagName, UserId};
use crate::error::DomainError;
use crate::ports::{
    PostListQuery, PostRepository, SortField, SortOrder, TagRepository, TransactionManager,
};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub status: String,
    pub tags: Vec<String>,
}

/// Full replacement of a post's editable fields. `status` is optional.
#[derive(Debug, Clone)]
pub struct UpdatePostInput {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: Option<String>,
}

/// Partial update; at least one field must be present.
#[derive(Debug, Clone, Default)]
pub struct PatchPostInput {
    pub id: PostId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PatchPostInput {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.status.is_none()
            && self.tags.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ListPostsInput {
    pub user_id: UserId,
    pub status: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// One page of posts.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_more: bool,
}

/// The post entry points exposed to controllers.
#[async_trait]
pub trait PostUseCases: Send + Sync {
    async fn create_post(&self, input: CreatePostInput) -> Result<Post, DomainError>;

    async fn update_post(&self, input: UpdatePostInput) -> Result<Post, DomainError>;

    async fn patch_post(&self, input: PatchPostInput) -> Result<Post, DomainError>;

    async fn get_post(&self, id: PostId) -> Result<Post, DomainError>;

    async fn list_posts(&self, input: ListPostsInput) -> Result<PostPage, DomainError>;
}

/// Post use cases over any store/transaction backend.
pub struct PostService<M: TransactionManager> {
    transactions: Arc<M>,
    posts: Arc<dyn PostRepository<M::Tx>>,
    tag_resolver: TagResolver<M::Tx>,
}

impl<M: TransactionManager> PostService<M> {
    pub fn new(
        transactions: Arc<M>,
        posts: Arc<dyn PostRepository<M::Tx>>,
        tags: Arc<dyn TagRepository<M::Tx>>,
    ) -> Self {
        Self {
            transactions,
            posts,
            tag_resolver: TagResolver::new(tags),
        }
    }

    async fn load(&self, id: PostId) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(|e| e.into_domain("failed to load post"))?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    /// Write the post row and, when `replace_tags` is set, its tag links, in
    /// one transaction. Tags are resolved first, then linked, then the row is
    /// updated.
    async fn save_changes(&self, post: &Post, replace_tags: bool) -> Result<(), DomainError> {
        let posts = Arc::clone(&self.posts);
        let resolver = self.tag_resolver.clone();
        let staged = post.clone();

        self.transactions
            .run_in_transaction(move |tx| {
                Box::pin(async move {
                    if replace_tags {
                        let tags = resolver.resolve_all(tx, staged.tags()).await?;
                        posts
                            .set_tags(tx, staged.id(), &tags)
                            .await
                            .map_err(|e| e.into_domain("failed to set tags"))?;
                    }
                    posts
                        .update(tx, &staged)
                        .await
                        .map_err(|e| e.into_domain("failed to update post"))?;
                    Ok::<(), DomainError>(())
                })
            })
            .await
    }
}

fn parse_tag_names(raw: &[String]) -> Result<Vec<TagName>, DomainError> {
    raw.iter().map(TagName::new).collect()
}

fn parse_status(raw: Option<&str>) -> Result<Option<PostStatus>, DomainError> {
    raw.map(PostStatus::parse).transpose()
}

#[async_trait]
impl<M: TransactionManager + 'static> PostUseCases for PostService<M> {
    async fn create_post(&self, input: CreatePostInput) -> Result<Post, DomainError> {
        let title = PostTitle::new(&input.title)?;
        let content = PostContent::new(input.content)?;
        let status = PostStatus::parse(&input.status)?;

        let mut post = Post::new(input.user_id, title, content, status)?;
        for raw in &input.tags {
            post.add_tag(TagName::new(raw)?)?;
        }

        let posts = Arc::clone(&self.posts);
        let resolver = self.tag_resolver.clone();
        let staged = post.clone();

        self.transactions
            .run_in_transaction(move |tx| {
                Box::pin(async move {
                    posts
                        .create(tx, &staged)
                        .await
                        .map_err(|e| e.into_domain("failed to create post"))?;
                    let tags = resolver.resolve_all(tx, staged.tags()).await?;
                    posts
                        .set_tags(tx, staged.id(), &tags)
                        .await
                        .map_err(|e| e.into_domain("failed to set tags"))?;
                    Ok::<(), DomainError>(())
                })
            })
            .await?;

        tracing::info!(
            post_id = %post.id(),
            user_id = %post.user_id(),
            status = %post.status(),
            "post created"
        );
        Ok(post)
    }

    async fn update_post(&self, input: UpdatePostInput) -> Result<Post, DomainError> {
        let title = PostTitle::new(&input.title)?;
        let content = PostContent::new(input.content)?;
        let tags = parse_tag_names(&input.tags)?;
        let status = parse_status(input.status.as_deref())?;

        let mut post = self.load(input.id).await?;
        post.set_title(title);
        post.set_content(content);
        if let Some(status) = status {
            post.set_status(status)?;
        }
        post.replace_tags(tags)?;

        self.save_changes(&post, true).await?;
        tracing::info!(post_id = %post.id(), "post updated");

        self.load(input.id).await
    }

    async fn patch_post(&self, input: PatchPostInput) -> Result<Post, DomainError> {
        if input.is_empty() {
            return Err(DomainError::invalid("no update fields"));
        }

        let title = input.title.as_deref().map(PostTitle::new).transpose()?;
        let content = input.content.map(PostContent::new).transpose()?;
        let status = parse_status(input.status.as_deref())?;
        let tags = input.tags.as_deref().map(parse_tag_names).transpose()?;

        let mut post = self.load(input.id).await?;
        if let Some(title) = title {
            post.set_title(title);
        }
        if let Some(content) = content {
            post.set_content(content);
        }
        if let Some(status) = status {
            post.set_status(status)?;
        }
        let replace_tags = tags.is_some();
        if let Some(tags) = tags {
            post.replace_tags(tags)?;
        }

        self.save_changes(&post, replace_tags).await?;
        tracing::info!(post_id = %post.id(), "post patched");

        self.load(input.id).await
    }

    async fn get_post(&self, id: PostId) -> Result<Post, DomainError> {
        self.load(id).await
    }

    async fn list_posts(&self, input: ListPostsInput) -> Result<PostPage, DomainError> {
        let limit = input.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(DomainError::invalid(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        let offset = input.offset.unwrap_or(0);
        let status = parse_status(input.status.as_deref())?;

        let query = PostListQuery {
            user_id: input.user_id,
            status,
            sort_by: input.sort_by,
            order: input.order,
            limit,
            offset,
        };
        let (posts, total) = self
            .posts
            .list(&query)
            .await
            .map_err(|e| e.into_domain("failed to list posts"))?;

        Ok(PostPage {
            posts,
            total,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < total,
        })
    }
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
