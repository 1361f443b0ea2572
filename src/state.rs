//! Application state management

use std::sync::Arc;

use crate::signature::SigningKey;
use crate::storage::BlobStore;

/// Shared application state
///
/// Read-only after startup, so requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    signing_key: SigningKey,
    blob_store: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(signing_key: SigningKey, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                signing_key,
                blob_store,
            }),
        }
    }

    /// Get the upload signing key
    pub fn signing_key(&self) -> &SigningKey {
        &self.inner.signing_key
    }

    /// Get the blob store
    pub fn blob_store(&self) -> &dyn BlobStore {
        self.inner.blob_store.as_ref()
    }
}
