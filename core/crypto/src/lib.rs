//! Cryptographic primitives for Keyhaven.
//!
//! This crate provides:
//! - Master password hashing using Argon2id
//! - Context-bound entry key derivation using Blake2b
//! - Authenticated encryption using XChaCha20-Poly1305
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Constant-time comparison for master key hashes

pub mod aead;
pub mod kdf;
pub mod keys;

pub use aead::{decrypt, encrypt, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_entry_key, hash_master_password, KdfParams};
pub use keys::{MasterKeyHash, Salt, SecretKey, KEY_LENGTH};
