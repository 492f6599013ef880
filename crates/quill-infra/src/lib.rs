//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains database, cache, and authentication integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory repositories and cache only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `redis` - Redis-backed response cache

pub mod auth;
pub mod cache;
pub mod database;
pub mod memory;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};

pub use auth::{Argon2PasswordService, JwtTokenService};

pub use database::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};

#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
