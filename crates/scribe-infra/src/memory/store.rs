//! Shared in-memory state and the transaction manager over it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use scribe_core::DomainError;
use scribe_core::domain::{Post, PostId, Tag, TagId, TagName, User, UserId};
use scribe_core::error::RepoError;
use scribe_core::ports::{TransactionManager, TxFuture};

/// Everything the in-memory adapters persist.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreData {
    pub(crate) posts: HashMap<PostId, Post>,
    pub(crate) tags: HashMap<TagId, Tag>,
    pub(crate) tag_ids_by_name: HashMap<TagName, TagId>,
    /// Ordered tag links per post.
    pub(crate) post_tags: HashMap<PostId, Vec<TagId>>,
    pub(crate) users: HashMap<UserId, User>,
}

impl StoreData {
    /// The stored post with its tag list rebuilt from the links.
    pub(crate) fn post_with_tags(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let Some(post) = self.posts.get(&id) else {
            return Ok(None);
        };

        let names = self
            .post_tags
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|tag_id| self.tags.get(tag_id))
                    .map(|tag| tag.name.clone())
                    .collect()
            })
            .unwrap_or_default();

        let mut record = post.clone().into_record();
        record.tags = names;
        Post::restore(record)
            .map(Some)
            .map_err(|e| RepoError::Query(e.to_string()))
    }
}

/// In-memory store shared by the in-memory repositories.
///
/// Used when no database is configured and as a test double.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, StoreData> {
        self.data.read().await
    }

    pub(crate) async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, StoreData> {
        self.data.write().await
    }
}

/// Handle for one open in-memory transaction.
///
/// Writes go to a private copy of the data that replaces the shared state
/// only on commit.
pub struct InMemoryTx {
    staged: Mutex<StoreData>,
}

impl InMemoryTx {
    pub(crate) async fn data(&self) -> MutexGuard<'_, StoreData> {
        self.staged.lock().await
    }
}

/// Serializes transactions by holding the store's write lock for their
/// whole duration.
pub struct InMemoryTransactionManager {
    store: Arc<InMemoryStore>,
}

impl InMemoryTransactionManager {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TransactionManager for InMemoryTransactionManager {
    type Tx = InMemoryTx;

    async fn run_in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c InMemoryTx) -> TxFuture<'c, T> + Send + 'static,
    {
        let mut shared = self.store.write().await;
        let tx = InMemoryTx {
            staged: Mutex::new(shared.clone()),
        };

        let result = work(&tx).await;
        match result {
            Ok(value) => {
                *shared = tx.staged.into_inner();
                tracing::debug!("in-memory transaction committed");
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "in-memory transaction rolled back");
                Err(err)
            }
        }
    }
}
