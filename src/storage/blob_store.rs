//! Blob store abstraction
//!
//! A put-by-key object store. Bodies are taken by value so the caller's
//! buffer is released as soon as the put completes or fails.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use tokio::sync::RwLock;

use super::types::{ObjectMetadata, StoredObject};
use crate::error::StorageError;

/// Trait for object storage backends
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<StoredObject, StorageError>;
}

/// A stored object held by [`MemoryBlobStore`]
#[derive(Debug, Clone)]
pub struct MemoryObject {
    pub body: Bytes,
    pub metadata: ObjectMetadata,
}

/// In-process blob store for tests and local runs
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<MemoryBlobStoreInner>,
}

#[derive(Default)]
struct MemoryBlobStoreInner {
    objects: RwLock<HashMap<String, MemoryObject>>,
    failing: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent put fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn get(&self, key: &str) -> Option<MemoryObject> {
        self.inner.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: ObjectMetadata,
    ) -> Result<StoredObject, StorageError> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(StorageError::PutFailed {
                key: key.to_string(),
                reason: "memory store is in failing mode".to_string(),
            });
        }

        let mut objects = self.inner.objects.write().await;
        objects.insert(key.to_string(), MemoryObject { body, metadata });

        Ok(StoredObject {
            key: key.to_string(),
            location: format!("memory://{}", key),
        })
    }
}
