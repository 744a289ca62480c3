//! # BlogSpot Infrastructure
//!
//! Concrete implementations of the ports defined in `blogspot-core`:
//! MongoDB repositories, Redis cache, JWT + Argon2 auth, Markdown rendering,
//! and the upload store. The cache and the repositories both have in-memory
//! fallbacks so the server (and its tests) can run without external services.

pub mod auth;
pub mod cache;
pub mod database;
pub mod markdown;
pub mod uploads;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use cache::{InMemoryCache, RedisCache, RedisConfig};
pub use database::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryReadingHistoryRepository,
    InMemoryUserRepository, MongoCommentRepository, MongoConfig, MongoConnections,
    MongoPostRepository, MongoReadingHistoryRepository, MongoUserRepository,
};
pub use markdown::render_markdown;
pub use uploads::UploadStore;
