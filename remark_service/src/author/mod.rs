//! Author management module.

/// Author persistence.
pub mod repository;
