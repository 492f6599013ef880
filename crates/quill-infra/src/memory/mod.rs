//! In-memory repository implementations.
//!
//! Used as the fallback when `DATABASE_URL` is not configured, and as the
//! backing store for handler tests. Data is lost on process restart.

mod post_repo;
mod user_repo;

pub use post_repo::InMemoryPostRepository;
pub use user_repo::InMemoryUserRepository;
