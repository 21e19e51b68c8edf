//! AWS-oriented adapters and the Lambda entry point for submission
//! processing.
//!
//! This crate owns runtime integration details (HTTP download, object
//! storage, email, and log-table adapters) around the pure orchestration
//! handler, and depends on `submission_core` for contracts and key
//! primitives.

pub mod adapters;
pub mod handlers;
