use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("alice@example.com".to_string(), "hash".to_string());
        repo.insert(user.clone()).await.unwrap();

        let found = repo.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(User::new("bob@example.com".to_string(), "h1".to_string()))
            .await
            .unwrap();

        let result = repo
            .insert(User::new("bob@example.com".to_string(), "h2".to_string()))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
