//! API key issuance backed by the OS RNG and SHA-256.
//!
//! Implements the `ApiKeyIssuer` trait from `threadline-core` using `rand`
//! for key material and the `sha2` crate (RustCrypto ecosystem) for hashing.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use threadline_core::service::keys::{API_KEY_PREFIX, ApiKeyIssuer};

/// Bytes of randomness per key (rendered as 64 hex chars).
const KEY_BYTES: usize = 32;

/// `tl_<64 hex>` keys, stored as lowercase hex SHA-256 digests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ApiKeyIssuer;

impl Sha256ApiKeyIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl ApiKeyIssuer for Sha256ApiKeyIssuer {
    fn generate(&self) -> String {
        let mut bytes = [0u8; KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{API_KEY_PREFIX}{hex}")
    }

    fn hash(&self, key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        format!("{:x}", digest)
    }
}
