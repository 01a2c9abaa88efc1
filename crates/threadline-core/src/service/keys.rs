//! ApiKeyIssuer trait for minting and hashing API keys.
//!
//! Defined here so the identity service can issue keys without coupling to a
//! specific RNG or digest. The `Sha256ApiKeyIssuer` adapter lives in
//! threadline-infra.

/// Prefix carried by every issued key.
pub const API_KEY_PREFIX: &str = "tl_";

/// Abstraction over key generation and one-way key hashing.
pub trait ApiKeyIssuer: Send + Sync {
    /// Mint a fresh plaintext key starting with [`API_KEY_PREFIX`].
    fn generate(&self) -> String;

    /// Hex digest stored in place of the plaintext key.
    ///
    /// Must be deterministic: the same key always yields the same hash.
    fn hash(&self, key: &str) -> String;
}
