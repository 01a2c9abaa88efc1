//! Cryptographic operations for Threadline.
//!
//! - `keys`: API key generation and SHA-256 hashing

pub mod keys;
