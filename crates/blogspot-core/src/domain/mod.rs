//! Domain entities - the documents persisted by the API.

mod comment;
mod post;
mod reading_history;
mod user;

pub use comment::Comment;
pub use post::{Post, PostPatch};
pub use reading_history::ReadingHistoryEntry;
pub use user::User;
