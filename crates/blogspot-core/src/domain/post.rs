use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a document in the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub title: String,
    pub content: String,
    /// Rendered HTML, present only when the author asked for Markdown rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    /// Public path of the uploaded header image, e.g. `/uploads/<file>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with timestamps set to now.
    pub fn new(user_id: ObjectId, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            user_id,
            title,
            content,
            content_html: None,
            header_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update applied to an existing post.
///
/// `None` fields are left untouched in the stored document.
#[derive(Debug, Clone)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub content_html: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl PostPatch {
    pub fn new() -> Self {
        Self {
            title: None,
            content: None,
            content_html: None,
            updated_at: Utc::now(),
        }
    }

    /// True when the patch would not change anything besides `updatedAt`.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.content_html.is_none()
    }
}

impl Default for PostPatch {
    fn default() -> Self {
        Self::new()
    }
}
