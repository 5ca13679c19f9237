//! Comment management module.
//!
//! Comments reference authors by id. Listings resolve those references with
//! one batched author lookup per call.

/// Comment persistence and author enrichment.
pub mod repository;
