//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod client;
pub mod job;

pub use client::ClientRefEntity;
pub use job::{JobStatusDb, SyncedJobEntity};
