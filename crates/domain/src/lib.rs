//! Domain layer for the Lighthouse sync tooling.
//!
//! This crate contains:
//! - Domain models (Vincere export records, internal jobs, clients, import reports)
//! - Free-text parsers for vessel, salary and schedule fields
//! - The Vincere to job field mapper and the batch import pipeline

pub mod models;
pub mod services;
