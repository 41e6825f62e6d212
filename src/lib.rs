#![deny(missing_docs)]

//! Core library for the Rusty Roster student records service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Mutation and summary counters.
pub mod metrics;
/// Student service tying the store, summary provider, and metrics together.
pub mod service;
/// In-memory student record store.
pub mod store;
/// Summary generation through a local language-model runtime.
pub mod summarization;
/// Input validation helpers.
pub mod validation;
