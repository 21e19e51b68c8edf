//! Shared submission-processing domain primitives.
//!
//! This crate owns the inbound request contract, artifact key generation,
//! and the notification-record schema. It intentionally excludes AWS SDK,
//! HTTP client, and Lambda runtime concerns.

pub mod contract;
pub mod storage_keys;
