//! MongoDB repository implementations.

use async_trait::async_trait;
use bson::{Bson, doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::Collection;

use blogspot_core::domain::{Comment, Post, PostPatch, ReadingHistoryEntry, User};
use blogspot_core::error::RepoError;
use blogspot_core::ports::{
    CommentRepository, PostRepository, ReadingHistoryRepository, UserRepository,
};

use super::connections::MongoConnections;

fn query_err(e: mongodb::error::Error) -> RepoError {
    RepoError::Query(e.to_string())
}

fn inserted_object_id(id: Bson) -> Result<ObjectId, RepoError> {
    id.as_object_id()
        .ok_or_else(|| RepoError::Query("insert returned a non-ObjectId id".to_string()))
}

/// `users` collection repository.
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &MongoConnections) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: User) -> Result<ObjectId, RepoError> {
        let result = self.collection.insert_one(&user).await.map_err(query_err)?;
        inserted_object_id(result.inserted_id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(query_err)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(query_err)
    }
}

/// `posts` collection repository.
pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(db: &MongoConnections) -> Self {
        Self {
            collection: db.collection("posts"),
        }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn insert(&self, post: Post) -> Result<ObjectId, RepoError> {
        let result = self.collection.insert_one(&post).await.map_err(query_err)?;
        inserted_object_id(result.inserted_id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Post>, RepoError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(query_err)
    }

    async fn list_page(&self, skip: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit as i64)
            .await
            .map_err(query_err)?;

        cursor.try_collect().await.map_err(query_err)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(query_err)
    }

    async fn update(&self, id: ObjectId, patch: PostPatch) -> Result<bool, RepoError> {
        let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(patch.updated_at) };
        if let Some(title) = patch.title {
            set.insert("title", title);
        }
        if let Some(content) = patch.content {
            set.insert("content", content);
        }
        if let Some(html) = patch.content_html {
            set.insert("contentHtml", html);
        }

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await
            .map_err(query_err)?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, RepoError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(query_err)?;

        Ok(result.deleted_count > 0)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Post>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(query_err)?;

        cursor.try_collect().await.map_err(query_err)
    }
}

/// `comments` collection repository.
pub struct MongoCommentRepository {
    collection: Collection<Comment>,
}

impl MongoCommentRepository {
    pub fn new(db: &MongoConnections) -> Self {
        Self {
            collection: db.collection("comments"),
        }
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn insert(&self, comment: Comment) -> Result<ObjectId, RepoError> {
        let result = self
            .collection
            .insert_one(&comment)
            .await
            .map_err(query_err)?;
        inserted_object_id(result.inserted_id)
    }

    async fn list_for_post(
        &self,
        post_id: ObjectId,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError> {
        let cursor = self
            .collection
            .find(doc! { "postId": post_id })
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit as i64)
            .await
            .map_err(query_err)?;

        cursor.try_collect().await.map_err(query_err)
    }

    async fn count_for_post(&self, post_id: ObjectId) -> Result<u64, RepoError> {
        self.collection
            .count_documents(doc! { "postId": post_id })
            .await
            .map_err(query_err)
    }
}

/// `readingHistory` collection repository.
pub struct MongoReadingHistoryRepository {
    collection: Collection<ReadingHistoryEntry>,
}

impl MongoReadingHistoryRepository {
    pub fn new(db: &MongoConnections) -> Self {
        Self {
            collection: db.collection("readingHistory"),
        }
    }
}

#[async_trait]
impl ReadingHistoryRepository for MongoReadingHistoryRepository {
    async fn upsert(
        &self,
        user_id: ObjectId,
        post_id: ObjectId,
        read_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        // The equality fields of the filter become part of the inserted
        // document, so a fresh upsert carries userId and postId too.
        self.collection
            .update_one(
                doc! { "userId": user_id, "postId": post_id },
                doc! { "$set": { "readAt": bson::DateTime::from_chrono(read_at) } },
            )
            .upsert(true)
            .await
            .map_err(query_err)?;

        Ok(())
    }

    async fn recent_for_user(
        &self,
        user_id: ObjectId,
        limit: u64,
    ) -> Result<Vec<ReadingHistoryEntry>, RepoError> {
        let cursor = self
            .collection
            .find(doc! { "userId": user_id })
            .sort(doc! { "readAt": -1 })
            .limit(limit as i64)
            .await
            .map_err(query_err)?;

        cursor.try_collect().await.map_err(query_err)
    }
}
