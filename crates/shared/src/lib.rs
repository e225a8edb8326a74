//! Shared utilities and common types for the Barshift backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Input validation and sanitization for registrant and shift data
//! - Verification of externally issued identity tokens

pub mod jwt;
pub mod validation;
