//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use quill_core::ports::{Cache, PostRepository, UserRepository};
use quill_infra::{InMemoryCache, InMemoryPostRepository, InMemoryUserRepository, RedisCache};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn Cache>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub cache_ttl: Duration,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let cache: Arc<dyn Cache> = match &config.redis_url {
            Some(_) => match RedisCache::from_env().await {
                Ok(redis) => Arc::new(redis),
                Err(e) => {
                    tracing::warn!(
                        "Failed to connect to Redis: {}. Using in-memory cache.",
                        e
                    );
                    Arc::new(InMemoryCache::new())
                }
            },
            None => Arc::new(InMemoryCache::new()),
        };

        #[cfg(feature = "postgres")]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            if let Some(db_config) = &config.database {
                match quill_infra::database::connect(db_config).await {
                    Ok(conn) => (
                        Arc::new(PostgresUserRepository::new(conn.clone())),
                        Arc::new(PostgresPostRepository::new(conn)),
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory repositories.",
                            e
                        );
                        (
                            Arc::new(InMemoryUserRepository::new()),
                            Arc::new(InMemoryPostRepository::new()),
                        )
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running with in-memory repositories.");
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryPostRepository::new()),
                )
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryPostRepository::new()),
            )
        };

        tracing::info!("Application state initialized");

        Self {
            cache,
            users,
            posts,
            cache_ttl: config.cache_ttl,
        }
    }

    /// State wired entirely in memory. Handler tests run against this.
    pub fn in_memory(cache_ttl: Duration) -> Self {
        Self {
            cache: Arc::new(InMemoryCache::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            cache_ttl,
        }
    }
}
