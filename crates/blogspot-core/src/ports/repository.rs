use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, Post, PostPatch, ReadingHistoryEntry, User};
use crate::error::RepoError;

/// User repository backed by the `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning the store-assigned id.
    async fn insert(&self, user: User) -> Result<ObjectId, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Total number of registered users.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Post repository backed by the `posts` collection.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: Post) -> Result<ObjectId, RepoError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Post>, RepoError>;

    /// One page of posts, newest first.
    async fn list_page(&self, skip: u64, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Total number of posts.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Apply a partial update. Returns `false` when no post matched the id.
    async fn update(&self, id: ObjectId, patch: PostPatch) -> Result<bool, RepoError>;

    /// Returns `false` when no post matched the id.
    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError>;

    /// Fetch the subset of `ids` that still exist, in no particular order.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository backed by the `comments` collection.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: Comment) -> Result<ObjectId, RepoError>;

    /// One page of a post's comments, newest first.
    async fn list_for_post(
        &self,
        post_id: ObjectId,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError>;

    async fn count_for_post(&self, post_id: ObjectId) -> Result<u64, RepoError>;
}

/// Reading history repository backed by the `readingHistory` collection.
#[async_trait]
pub trait ReadingHistoryRepository: Send + Sync {
    /// Insert or refresh the (user, post) entry, setting `readAt`.
    async fn upsert(
        &self,
        user_id: ObjectId,
        post_id: ObjectId,
        read_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    /// Most recent entries for a user, newest first, capped at `limit`.
    async fn recent_for_user(
        &self,
        user_id: ObjectId,
        limit: u64,
    ) -> Result<Vec<ReadingHistoryEntry>, RepoError>;
}
