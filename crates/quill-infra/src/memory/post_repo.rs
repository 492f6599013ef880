use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{PageRequest, Post, PostFilter, PostPage};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

/// In-memory post repository backed by a HashMap behind an async RwLock.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        if store.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<PostPage, RepoError> {
        let store = self.store.read().await;

        let mut matches: Vec<Post> = store
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        // Newest first, id as tiebreaker so the order is stable
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect();

        Ok(PostPage { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> Post {
        Post::new(Uuid::new_v4(), title.to_string(), content.to_string())
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryPostRepository::new();
        let created = repo.insert(post("First post", "Some content here")).await.unwrap();

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "First post");
        assert_eq!(found.user_id, created.user_id);
    }

    #[tokio::test]
    async fn test_update_missing_post_fails() {
        let repo = InMemoryPostRepository::new();
        let result = repo.update(post("Ghost post", "Never inserted content")).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_removes_from_search() {
        let repo = InMemoryPostRepository::new();
        let created = repo.insert(post("Doomed post", "Short-lived content")).await.unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
        let page = repo
            .search(&PostFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);

        // A second delete reports the row as gone
        assert!(matches!(repo.delete(created.id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_search_filters_title_case_insensitively() {
        let repo = InMemoryPostRepository::new();
        repo.insert(post("Rust for beginners", "filler content")).await.unwrap();
        repo.insert(post("Advanced RUST tips", "filler content")).await.unwrap();
        repo.insert(post("Cooking pasta", "filler content")).await.unwrap();

        let filter = PostFilter {
            title: Some("rust".to_string()),
            ..Default::default()
        };
        let page = repo.search(&filter, PageRequest::default()).await.unwrap();

        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|p| p.title.to_lowercase().contains("rust")));
    }

    #[tokio::test]
    async fn test_search_paginates_newest_first() {
        let repo = InMemoryPostRepository::new();
        for i in 0..5 {
            let mut p = post(&format!("Post number {i}"), "filler content");
            p.created_at = chrono::Utc::now() + chrono::TimeDelta::seconds(i);
            repo.insert(p).await.unwrap();
        }

        let page = repo
            .search(
                &PostFilter::default(),
                PageRequest::new(Some(2), Some(2)),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "Post number 2");
        assert_eq!(page.items[1].title, "Post number 1");
    }
}
