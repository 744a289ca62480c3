//! Persistence gateway - MongoDB connection and collection repositories,
//! with in-memory fallbacks.

mod connections;
mod memory;
mod mongo;

pub use connections::{MongoConfig, MongoConnections};
pub use memory::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryReadingHistoryRepository,
    InMemoryUserRepository,
};
pub use mongo::{
    MongoCommentRepository, MongoPostRepository, MongoReadingHistoryRepository,
    MongoUserRepository,
};
