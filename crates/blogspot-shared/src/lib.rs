//! # BlogSpot Shared
//!
//! Request/response types shared between the server and API clients.
//! JSON field names are camelCase to match the documents the store keeps.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
