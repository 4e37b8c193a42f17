//! In-memory repository implementations.

use std::sync::Arc;

use async_trait::async_trait;

use scribe_core::domain::{Post, PostId, Tag, TagName, User, UserId};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    BaseRepository, PostListQuery, PostRepository, SortField, SortOrder, TagRepository,
    UserRepository,
};

use super::store::{InMemoryStore, InMemoryTx};

pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PostRepository<InMemoryTx> for InMemoryPostRepository {
    async fn create(&self, tx: &InMemoryTx, post: &Post) -> Result<(), RepoError> {
        let mut data = tx.data().await;
        if data.posts.contains_key(&post.id()) {
            return Err(RepoError::Constraint(format!(
                "post {} already exists",
                post.id()
            )));
        }
        data.posts.insert(post.id(), post.clone());
        Ok(())
    }

    async fn update(&self, tx: &InMemoryTx, post: &Post) -> Result<(), RepoError> {
        let mut data = tx.data().await;
        let row = data.posts.get_mut(&post.id()).ok_or(RepoError::NotFound)?;
        *row = post.clone();
        Ok(())
    }

    async fn set_tags(
        &self,
        tx: &InMemoryTx,
        post_id: PostId,
        tags: &[Tag],
    ) -> Result<(), RepoError> {
        let mut data = tx.data().await;
        if !data.posts.contains_key(&post_id) {
            return Err(RepoError::Constraint(format!("post {post_id} does not exist")));
        }
        for tag in tags {
            if !data.tags.contains_key(&tag.id) {
                return Err(RepoError::Constraint(format!("tag {} does not exist", tag.id)));
            }
        }
        data.post_tags
            .insert(post_id, tags.iter().map(|tag| tag.id).collect());
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        self.store.read().await.post_with_tags(id)
    }

    async fn list(&self, query: &PostListQuery) -> Result<(Vec<Post>, u64), RepoError> {
        let data = self.store.read().await;

        let mut matching: Vec<&Post> = data
            .posts
            .values()
            .filter(|post| post.user_id() == query.user_id)
            .filter(|post| query.status.is_none_or(|status| post.status() == status))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
                SortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
            }
            .then_with(|| a.id().cmp(&b.id()));
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        let page = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| data.post_with_tags(post.id()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();

        Ok((page, total))
    }
}

pub struct InMemoryTagRepository;

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InMemoryTagRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagRepository<InMemoryTx> for InMemoryTagRepository {
    async fn find_or_create_by_name(
        &self,
        tx: &InMemoryTx,
        name: &TagName,
    ) -> Result<Tag, RepoError> {
        let mut data = tx.data().await;
        if let Some(tag) = data
            .tag_ids_by_name
            .get(name)
            .and_then(|id| data.tags.get(id))
        {
            return Ok(tag.clone());
        }

        let tag = Tag::new(name.clone());
        data.tag_ids_by_name.insert(name.clone(), tag.id);
        data.tags.insert(tag.id, tag.clone());
        tracing::debug!(tag = %tag.name, "tag created");
        Ok(tag)
    }
}

/// In-memory user repository for when the database is not configured.
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, UserId> for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut data = self.store.write().await;
        if data.users.contains_key(&user.id)
            || data.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        data.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let data = self.store.read().await;
        Ok(data
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
