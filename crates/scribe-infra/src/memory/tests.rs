use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use scribe_core::domain::{PostStatus, Tag, TagName, User, UserId};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, SortField, SortOrder, TagRepository, UserRepository};
use scribe_core::services::{
    CreatePostInput, ListPostsInput, PatchPostInput, PostService, PostUseCases, UpdatePostInput,
};
use scribe_core::{DomainError, ErrorKind};

use super::{
    InMemoryPostRepository, InMemoryStore, InMemoryTagRepository, InMemoryTransactionManager,
    InMemoryTx, InMemoryUserRepository,
};

/// Delegates to the real tag repository but fails the n-th call.
struct FailingTags {
    inner: InMemoryTagRepository,
    calls: AtomicUsize,
    fail_on: usize,
}

#[async_trait]
impl TagRepository<InMemoryTx> for FailingTags {
    async fn find_or_create_by_name(
        &self,
        tx: &InMemoryTx,
        name: &TagName,
    ) -> Result<Tag, RepoError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(RepoError::Query("injected failure".to_string()));
        }
        self.inner.find_or_create_by_name(tx, name).await
    }
}

/// Hangs forever on the second resolution.
struct StallingTags {
    inner: InMemoryTagRepository,
    calls: AtomicUsize,
}

#[async_trait]
impl TagRepository<InMemoryTx> for StallingTags {
    async fn find_or_create_by_name(
        &self,
        tx: &InMemoryTx,
        name: &TagName,
    ) -> Result<Tag, RepoError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
            std::future::pending::<()>().await;
        }
        self.inner.find_or_create_by_name(tx, name).await
    }
}

fn service_with_tags(
    store: &Arc<InMemoryStore>,
    tags: Arc<dyn TagRepository<InMemoryTx>>,
) -> PostService<InMemoryTransactionManager> {
    PostService::new(
        Arc::new(InMemoryTransactionManager::new(Arc::clone(store))),
        Arc::new(InMemoryPostRepository::new(Arc::clone(store))),
        tags,
    )
}

fn service(store: &Arc<InMemoryStore>) -> PostService<InMemoryTransactionManager> {
    service_with_tags(store, Arc::new(InMemoryTagRepository::new()))
}

fn create_input(user_id: UserId, status: &str, tags: &[&str]) -> CreatePostInput {
    CreatePostInput {
        user_id,
        title: "Hello".to_string(),
        content: "World".to_string(),
        status: status.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn tag_names(post: &scribe_core::domain::Post) -> Vec<String> {
    post.tags().iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
async fn test_create_persists_post_and_links() {
    let store = InMemoryStore::new();
    let posts = service(&store);

    let created = posts
        .create_post(create_input(UserId::new(), "draft", &["go", "testing"]))
        .await
        .unwrap();

    let loaded = posts.get_post(created.id()).await.unwrap();
    assert_eq!(tag_names(&loaded), ["go", "testing"]);
    assert_eq!(loaded.status(), PostStatus::Draft);
    assert!(loaded.first_published_at().is_none());

    let data = store.read().await;
    assert_eq!(data.tags.len(), 2);
    assert_eq!(data.post_tags[&created.id()].len(), 2);
}

#[tokio::test]
async fn test_failed_tag_resolution_commits_nothing() {
    let store = InMemoryStore::new();
    let failing = Arc::new(FailingTags {
        inner: InMemoryTagRepository::new(),
        calls: AtomicUsize::new(0),
        fail_on: 2,
    });
    let posts = service_with_tags(&store, failing.clone());

    let err = posts
        .create_post(create_input(UserId::new(), "draft", &["a", "b", "c"]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(failing.calls.load(Ordering::SeqCst), 2);

    let data = store.read().await;
    assert!(data.posts.is_empty());
    assert!(data.post_tags.is_empty());
    // The tag created by the first resolution is rolled back too.
    assert!(data.tags.is_empty());
}

#[tokio::test]
async fn test_cancelled_create_rolls_back() {
    let store = InMemoryStore::new();
    let stalling = Arc::new(StallingTags {
        inner: InMemoryTagRepository::new(),
        calls: AtomicUsize::new(0),
    });
    let posts = service_with_tags(&store, stalling);

    let attempt = tokio::time::timeout(
        Duration::from_millis(50),
        posts.create_post(create_input(UserId::new(), "draft", &["a", "b", "c"])),
    )
    .await;
    assert!(attempt.is_err());

    {
        let data = store.read().await;
        assert!(data.posts.is_empty());
        assert!(data.tags.is_empty());
        assert!(data.post_tags.is_empty());
    }

    // The dropped transaction released the store.
    let created = service(&store)
        .create_post(create_input(UserId::new(), "draft", &["a"]))
        .await
        .unwrap();
    assert_eq!(tag_names(&created), ["a"]);
}

#[tokio::test]
async fn test_tags_are_shared_between_posts() {
    let store = InMemoryStore::new();
    let posts = service(&store);
    let user_id = UserId::new();

    let first = posts
        .create_post(create_input(user_id, "draft", &["rust"]))
        .await
        .unwrap();
    let second = posts
        .create_post(create_input(user_id, "published", &["Rust", "web"]))
        .await
        .unwrap();

    let data = store.read().await;
    assert_eq!(data.tags.len(), 2);
    assert_eq!(
        data.post_tags[&first.id()][0],
        data.post_tags[&second.id()][0]
    );
}

#[tokio::test]
async fn test_update_relinks_and_returns_stored_state() {
    let store = InMemoryStore::new();
    let posts = service(&store);
    let created = posts
        .create_post(create_input(UserId::new(), "draft", &["go", "testing"]))
        .await
        .unwrap();

    let updated = posts
        .update_post(UpdatePostInput {
            id: created.id(),
            title: "Hello & welcome".into(),
            content: "Rewritten".into(),
            tags: vec!["testing".into(), "rust".into()],
            status: Some("published".into()),
        })
        .await
        .unwrap();

    assert_eq!(updated.title().as_str(), "Hello &amp; welcome");
    assert_eq!(tag_names(&updated), ["testing", "rust"]);
    assert_eq!(updated.status(), PostStatus::Published);
    assert!(updated.first_published_at().is_some());
    assert_eq!(updated, posts.get_post(created.id()).await.unwrap());
}

#[tokio::test]
async fn test_rejected_transition_leaves_store_untouched() {
    let store = InMemoryStore::new();
    let posts = service(&store);
    let created = posts
        .create_post(create_input(UserId::new(), "published", &["go"]))
        .await
        .unwrap();

    let err = posts
        .update_post(UpdatePostInput {
            id: created.id(),
            title: "Changed".into(),
            content: "Changed".into(),
            tags: vec![],
            status: Some("deleted".into()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.message(), "only draft and private posts can be deleted");

    let stored = posts.get_post(created.id()).await.unwrap();
    assert_eq!(stored.title().as_str(), "Hello");
    assert_eq!(tag_names(&stored), ["go"]);
}

#[tokio::test]
async fn test_patch_private_then_republish_keeps_first_publish() {
    let store = InMemoryStore::new();
    let posts = service(&store);
    let created = posts
        .create_post(create_input(UserId::new(), "published", &[]))
        .await
        .unwrap();
    let first = created.first_published_at();

    let patch = |status: &str| PatchPostInput {
        id: created.id(),
        status: Some(status.to_string()),
        ..Default::default()
    };

    let private = posts.patch_post(patch("private")).await.unwrap();
    assert_eq!(private.status(), PostStatus::Private);

    let republished = posts.patch_post(patch("published")).await.unwrap();
    assert_eq!(republished.first_published_at(), first);

    posts.patch_post(patch("private")).await.unwrap();
    let deleted = posts.patch_post(patch("deleted")).await.unwrap();
    assert_eq!(deleted.status(), PostStatus::Deleted);
    assert_eq!(deleted.first_published_at(), first);
}

#[tokio::test]
async fn test_patch_tags_only() {
    let store = InMemoryStore::new();
    let posts = service(&store);
    let created = posts
        .create_post(create_input(UserId::new(), "draft", &["go"]))
        .await
        .unwrap();

    let patched = posts
        .patch_post(PatchPostInput {
            id: created.id(),
            tags: Some(vec![]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(patched.tags().is_empty());
    assert_eq!(patched.content_updated_at(), created.content_updated_at());
}

#[tokio::test]
async fn test_list_filters_sorts_and_pages() {
    let store = InMemoryStore::new();
    let posts = service(&store);
    let user_id = UserId::new();

    let mut ids = Vec::new();
    for status in ["draft", "published", "draft"] {
        let post = posts
            .create_post(create_input(user_id, status, &["go"]))
            .await
            .unwrap();
        ids.push(post.id());
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let drafts = posts
        .list_posts(ListPostsInput {
            user_id,
            status: Some("draft".into()),
            sort_by: SortField::CreatedAt,
            order: SortOrder::Asc,
            limit: Some(1),
            offset: Some(0),
        })
        .await
        .unwrap();
    assert_eq!(drafts.total, 2);
    assert!(drafts.has_more);
    assert_eq!(drafts.posts[0].id(), ids[0]);
    assert_eq!(tag_names(&drafts.posts[0]), ["go"]);

    let newest = posts
        .list_posts(ListPostsInput {
            user_id,
            status: None,
            sort_by: SortField::CreatedAt,
            order: SortOrder::Desc,
            limit: Some(10),
            offset: None,
        })
        .await
        .unwrap();
    assert_eq!(newest.total, 3);
    assert!(!newest.has_more);
    assert_eq!(newest.posts[0].id(), ids[2]);
}

#[tokio::test]
async fn test_user_repository_rejects_duplicate_email() {
    let store = InMemoryStore::new();
    let users = InMemoryUserRepository::new(store);

    let user = users
        .insert(User::new("ada@example.com".into(), "hash".into()))
        .await
        .unwrap();
    let err = users
        .insert(User::new("ADA@example.com".into(), "hash".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));
    assert_eq!(DomainError::from(err).kind(), ErrorKind::Conflict);

    let found = users.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(users.find_by_id(user.id).await.unwrap().is_some());
}
