//! Repository implementations for database operations.

pub mod client;
pub mod job;

pub use client::ClientRepository;
pub use job::JobRepository;
