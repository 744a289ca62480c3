//! # BlogSpot Core
//!
//! The domain layer of the BlogSpot backend.
//! This crate contains the entities and port traits with zero infrastructure
//! dependencies beyond the BSON document types.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::RepoError;
