//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod admin;

#[allow(unused_imports)] // Re-exports for downstream use
pub use admin::AdminAuth;
