//! Domain layer for the Barshift backend.
//!
//! This crate contains:
//! - Domain models (Shift, Registration, reminders, admin membership)
//! - Capacity and admission rules
//! - The reminder delivery seam

pub mod models;
pub mod services;
