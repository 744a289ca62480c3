//! Application state - shared across all handlers.
//!
//! Every gateway is an explicitly constructed, injected dependency: built
//! once at process start, dropped at shutdown, and handed to handlers
//! through `web::Data`. Nothing here is a module-level singleton.

use std::path::PathBuf;
use std::sync::Arc;

use blogspot_core::ports::{
    Cache, CommentRepository, PostRepository, ReadingHistoryRepository, UserRepository,
};
use blogspot_infra::cache::{InMemoryCache, RedisCache};
use blogspot_infra::database::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryReadingHistoryRepository,
    InMemoryUserRepository, MongoCommentRepository, MongoConnections, MongoPostRepository,
    MongoReadingHistoryRepository, MongoUserRepository,
};
use blogspot_infra::uploads::UploadStore;

use crate::config::AppConfig;

type Repositories = (
    Option<Arc<MongoConnections>>,
    Arc<dyn UserRepository>,
    Arc<dyn PostRepository>,
    Arc<dyn CommentRepository>,
    Arc<dyn ReadingHistoryRepository>,
);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn Cache>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub history: Arc<dyn ReadingHistoryRepository>,
    pub uploads: Arc<UploadStore>,
    pub db: Option<Arc<MongoConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Unreachable backing services degrade to the in-memory fallbacks with
    /// a logged warning instead of refusing to start.
    pub async fn new(config: &AppConfig) -> Self {
        let cache: Arc<dyn Cache> = match RedisCache::new(config.redis.clone()).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                if config.redis.fallback_to_memory {
                    tracing::warn!(error = %e, "Redis unavailable, using in-memory cache");
                } else {
                    tracing::error!(
                        error = %e,
                        "Redis unavailable and fallback disabled, using in-memory cache anyway"
                    );
                }
                Arc::new(InMemoryCache::new())
            }
        };

        let (db, users, posts, comments, history) =
            match MongoConnections::init(&config.mongo).await {
                Ok(conn) => {
                    let conn = Arc::new(conn);
                    (
                        Some(conn.clone()),
                        Arc::new(MongoUserRepository::new(&conn)) as Arc<dyn UserRepository>,
                        Arc::new(MongoPostRepository::new(&conn)) as Arc<dyn PostRepository>,
                        Arc::new(MongoCommentRepository::new(&conn)) as Arc<dyn CommentRepository>,
                        Arc::new(MongoReadingHistoryRepository::new(&conn))
                            as Arc<dyn ReadingHistoryRepository>,
                    )
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to connect to MongoDB, using in-memory repositories"
                    );
                    Self::memory_repositories()
                }
            };

        let uploads = Arc::new(UploadStore::new(&config.upload_dir));
        if let Err(e) = uploads.init().await {
            tracing::error!(error = %e, "Failed to create upload directory");
        }

        tracing::info!("Application state initialized");

        Self {
            cache,
            users,
            posts,
            comments,
            history,
            uploads,
            db,
        }
    }

    /// Fully in-memory state - the fallback path, and the backing for
    /// handler tests.
    pub fn in_memory(upload_dir: impl Into<PathBuf>) -> Self {
        let (db, users, posts, comments, history) = Self::memory_repositories();
        Self {
            cache: Arc::new(InMemoryCache::new()),
            users,
            posts,
            comments,
            history,
            uploads: Arc::new(UploadStore::new(upload_dir)),
            db,
        }
    }

    fn memory_repositories() -> Repositories {
        (
            None,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryCommentRepository::new()),
            Arc::new(InMemoryReadingHistoryRepository::new()),
        )
    }

    /// Whether the persistence gateway answers. The in-memory fallback has
    /// nothing to probe and reports alive.
    pub async fn db_alive(&self) -> bool {
        match &self.db {
            Some(conn) => conn.is_alive().await,
            None => true,
        }
    }
}
