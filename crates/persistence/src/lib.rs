//! Persistence layer for the Barshift backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the atomic admission operation
//! - Embedded migrations under `src/migrations`

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
