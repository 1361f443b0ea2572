//! Storage types

/// Metadata attached to an uploaded object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: String,
    /// Verified SHA-256 of the object body, stored as `sha256-hash`
    pub sha256_hash: String,
}

impl ObjectMetadata {
    /// User metadata key holding the content hash
    pub const HASH_KEY: &'static str = "sha256-hash";

    pub fn new(content_type: impl Into<String>, sha256_hash: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            sha256_hash: sha256_hash.into(),
        }
    }
}

/// Result of a successful put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// Where the object can be fetched from
    pub location: String,
}
