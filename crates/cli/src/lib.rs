//! `lighthouse-sync`: pulls job postings from the Vincere ATS, normalizes
//! them and imports them into the Lighthouse jobs table.

pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod logging;
pub mod report;
pub mod vincere;
