//! Signed Upload Module
//!
//! Devices upload log archives with four authentication headers:
//! - `x-timestamp`, `x-device-id`: caller identity and clock
//! - `x-file-hash`: SHA-256 of the file
//! - `x-signature`: HMAC over the above plus `Content-Type` (see [`crate::signature`])
//!
//! Checks run in order and stop at the first failure:
//! 1. All auth headers present (401)
//! 2. A file part present (400)
//! 3. Received bytes hash to the declared hash (400)
//! 4. Signature matches the one recomputed from the received bytes (401)
//!
//! Only then is the file written to the blob store.

pub mod handler;
pub mod payload;
pub mod types;

pub use handler::{process_upload, storage_key};
pub use payload::read_payload;
pub use types::*;
