//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::UserRepository;
use scribe_core::services::{PostService, PostUseCases};
use scribe_infra::memory::{
    InMemoryPostRepository, InMemoryStore, InMemoryTagRepository, InMemoryTransactionManager,
    InMemoryUserRepository,
};

use crate::config::DatabaseSettings;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostUseCases>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(database: Option<&DatabaseSettings>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(settings) = database {
                match Self::postgres(settings).await {
                    Ok(state) => {
                        tracing::info!("Application state initialized (postgres)");
                        return state;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if database.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory()
    }

    /// State backed by one fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let posts = PostService::new(
            Arc::new(InMemoryTransactionManager::new(Arc::clone(&store))),
            Arc::new(InMemoryPostRepository::new(Arc::clone(&store))),
            Arc::new(InMemoryTagRepository::new()),
        );

        Self {
            posts: Arc::new(posts),
            users: Arc::new(InMemoryUserRepository::new(store)),
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres(settings: &DatabaseSettings) -> Result<Self, sea_orm::DbErr> {
        use scribe_infra::database::{
            DatabaseConfig, PostgresPostRepository, PostgresTagRepository,
            PostgresUserRepository, SeaOrmTransactionManager, connect,
        };

        let db = connect(&DatabaseConfig {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
        })
        .await?;

        let posts = PostService::new(
            Arc::new(SeaOrmTransactionManager::new(db.clone())),
            Arc::new(PostgresPostRepository::new(db.clone())),
            Arc::new(PostgresTagRepository::new()),
        );

        Ok(Self {
            posts: Arc::new(posts),
            users: Arc::new(PostgresUserRepository::new(db)),
        })
    }
}
