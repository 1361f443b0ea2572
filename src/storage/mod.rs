//! Storage module for S3-compatible backends
//!
//! Uploads go through the [`BlobStore`] trait; S3 and in-memory backends
//! are provided.

mod blob_store;
mod s3_client;
mod types;

pub use blob_store::{BlobStore, MemoryBlobStore, MemoryObject};
pub use s3_client::S3BlobStore;
pub use types::*;
