use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reading history entry - a document in the `readingHistory` collection.
///
/// One document per (userId, postId) pair; `readAt` is refreshed on every
/// repeated read rather than inserting a second document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingHistoryEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub post_id: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub read_at: DateTime<Utc>,
}
