use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User entity - a document in the `users` collection.
///
/// The id is assigned by the store on insert; `password` always holds the
/// Argon2 hash, never the plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            username,
            email,
            password_hash,
        }
    }
}
