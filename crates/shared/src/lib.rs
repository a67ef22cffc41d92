//! Shared utilities and common types for the Lighthouse sync tooling.
//!
//! This crate provides common functionality used across all other crates:
//! - Lenient timestamp and date parsing for ATS exports
//! - Offset pagination helpers for start/limit style APIs
//! - Common validation logic

pub mod dates;
pub mod pagination;
pub mod validation;
