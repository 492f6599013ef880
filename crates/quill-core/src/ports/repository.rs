use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{PageRequest, Post, PostFilter, PostPage, User};
use crate::error::RepoError;

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Persist a new user.
    async fn insert(&self, user: User) -> Result<User, RepoError>;
}

/// Post repository.
///
/// Insert and update are distinct operations: the API reports creation (201)
/// and missing rows (404) differently, so an upsert-style `save` would lose
/// that distinction.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Persist a new post.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Update an existing post. Fails with [`RepoError::NotFound`] if the row
    /// no longer exists.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete a post by ID. Fails with [`RepoError::NotFound`] if the row
    /// does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Filtered, paginated listing ordered by `created_at` descending.
    async fn search(&self, filter: &PostFilter, page: PageRequest)
    -> Result<PostPage, RepoError>;
}
