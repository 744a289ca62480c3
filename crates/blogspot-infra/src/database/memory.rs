//! In-memory repository implementations - used when MongoDB is not reachable
//! and as the backing store for handler tests.
//!
//! Ids are assigned on insert, mirroring what the store would do.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use blogspot_core::domain::{Comment, Post, PostPatch, ReadingHistoryEntry, User};
use blogspot_core::error::RepoError;
use blogspot_core::ports::{
    CommentRepository, PostRepository, ReadingHistoryRepository, UserRepository,
};

/// In-memory `users` repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, mut user: User) -> Result<ObjectId, RepoError> {
        let id = ObjectId::new();
        user.id = Some(id);
        self.store.write().await.push(user);
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|u| u.email == email).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.len() as u64)
    }
}

/// In-memory `posts` repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, mut post: Post) -> Result<ObjectId, RepoError> {
        let id = ObjectId::new();
        post.id = Some(id);
        self.store.write().await.push(post);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|p| p.id == Some(id)).cloned())
    }

    async fn list_page(&self, skip: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.len() as u64)
    }

    async fn update(&self, id: ObjectId, patch: PostPatch) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        let Some(post) = store.iter_mut().find(|p| p.id == Some(id)) else {
            return Ok(false);
        };

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(html) = patch.content_html {
            post.content_html = Some(html);
        }
        post.updated_at = patch.updated_at;

        Ok(true)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|p| p.id != Some(id));
        Ok(store.len() < before)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .iter()
            .filter(|p| p.id.map(|id| ids.contains(&id)).unwrap_or(false))
            .cloned()
            .collect())
    }
}

/// In-memory `comments` repository.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    store: RwLock<Vec<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, mut comment: Comment) -> Result<ObjectId, RepoError> {
        let id = ObjectId::new();
        comment.id = Some(id);
        self.store.write().await.push(comment);
        Ok(id)
    }

    async fn list_for_post(
        &self,
        post_id: ObjectId,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;
        let mut comments: Vec<Comment> = store
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_for_post(&self, post_id: ObjectId) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().filter(|c| c.post_id == post_id).count() as u64)
    }
}

/// In-memory `readingHistory` repository.
#[derive(Default)]
pub struct InMemoryReadingHistoryRepository {
    store: RwLock<Vec<ReadingHistoryEntry>>,
}

impl InMemoryReadingHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingHistoryRepository for InMemoryReadingHistoryRepository {
    async fn upsert(
        &self,
        user_id: ObjectId,
        post_id: ObjectId,
        read_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        match store
            .iter_mut()
            .find(|e| e.user_id == user_id && e.post_id == post_id)
        {
            Some(entry) => entry.read_at = read_at,
            None => store.push(ReadingHistoryEntry {
                id: Some(ObjectId::new()),
                user_id,
                post_id,
                read_at,
            }),
        }
        Ok(())
    }

    async fn recent_for_user(
        &self,
        user_id: ObjectId,
        limit: u64,
    ) -> Result<Vec<ReadingHistoryEntry>, RepoError> {
        let store = self.store.read().await;
        let mut entries: Vec<ReadingHistoryEntry> = store
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.read_at.cmp(&a.read_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn user_insert_assigns_an_id() {
        let repo = InMemoryUserRepository::new();
        let id = repo
            .insert(User::new(
                "alice".to_string(),
                "alice@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .unwrap();

        let found = repo.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, Some(id));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn post_pages_are_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = ObjectId::new();
        let base = Utc::now();

        for i in 0..5 {
            let mut post = Post::new(author, format!("post {i}"), "body".to_string());
            post.created_at = base + Duration::seconds(i);
            repo.insert(post).await.unwrap();
        }

        let page = repo.list_page(0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "post 4");
        assert_eq!(page[1].title, "post 3");

        let last = repo.list_page(4, 2).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "post 0");
    }

    #[tokio::test]
    async fn post_update_reports_missing_ids() {
        let repo = InMemoryPostRepository::new();
        let id = repo
            .insert(Post::new(
                ObjectId::new(),
                "title".to_string(),
                "content".to_string(),
            ))
            .await
            .unwrap();

        let mut patch = PostPatch::new();
        patch.title = Some("new title".to_string());
        assert!(repo.update(id, patch).await.unwrap());
        assert_eq!(
            repo.find_by_id(id).await.unwrap().unwrap().title,
            "new title"
        );

        assert!(!repo.update(ObjectId::new(), PostPatch::new()).await.unwrap());
    }

    #[tokio::test]
    async fn history_upsert_is_idempotent_per_pair() {
        let repo = InMemoryReadingHistoryRepository::new();
        let user = ObjectId::new();
        let post = ObjectId::new();
        let first = Utc::now();
        let second = first + Duration::seconds(60);

        repo.upsert(user, post, first).await.unwrap();
        repo.upsert(user, post, second).await.unwrap();

        let entries = repo.recent_for_user(user, 20).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].read_at, second);
    }

    #[tokio::test]
    async fn history_is_capped_and_newest_first() {
        let repo = InMemoryReadingHistoryRepository::new();
        let user = ObjectId::new();
        let base = Utc::now();

        let mut newest = ObjectId::new();
        for i in 0..25 {
            let post = ObjectId::new();
            repo.upsert(user, post, base + Duration::seconds(i))
                .await
                .unwrap();
            newest = post;
        }

        let entries = repo.recent_for_user(user, 20).await.unwrap();
        assert_eq!(entries.len(), 20);
        assert_eq!(entries[0].post_id, newest);
    }
}
