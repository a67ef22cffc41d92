//! Persistence layer for the Lighthouse sync tooling.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The PostgreSQL import store used by the job importer

pub mod db;
pub mod entities;
pub mod import_store;
pub mod metrics;
pub mod repositories;

pub use import_store::PgImportStore;
