//! Log Ingest Server Library
//!
//! Accepts signed log archive uploads from devices and stores them in an
//! S3-compatible bucket. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `signature`: HMAC request signatures and constant-time comparison
//! - `upload`: Header, payload, integrity and signature checks
//! - `storage`: Blob store trait with S3 and in-memory backends
//! - `routes`: HTTP endpoints

pub mod config;
pub mod error;
pub mod routes;
pub mod signature;
pub mod state;
pub mod storage;
pub mod upload;
