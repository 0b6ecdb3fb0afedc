//! Key types with secure memory handling.
//!
//! All key types automatically zeroize their memory on drop to prevent
//! sensitive data from persisting in memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of symmetric keys and master key hashes in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// One-way hash of the master password.
///
/// This value is persisted (it is the MasterKeyRecord payload) and doubles
/// as the root input to entry key derivation. It is never sufficient on its
/// own to decrypt anything: every secret uses a key derived from this hash
/// plus entry-identifying context.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct MasterKeyHash {
    hash: [u8; KEY_LENGTH],
}

impl MasterKeyHash {
    /// Create a master key hash from raw bytes.
    pub fn from_bytes(hash: [u8; KEY_LENGTH]) -> Self {
        Self { hash }
    }

    /// Get the hash bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.hash
    }

    /// Constant-time equality check.
    ///
    /// Used for master password validation so comparison time does not leak
    /// how many leading bytes matched.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.hash.ct_eq(&other.hash).into()
    }
}

impl fmt::Debug for MasterKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKeyHash([REDACTED])")
    }
}

/// Symmetric key for encrypting a single secret field.
///
/// Derived per secret from the master key hash and the entry's context
/// strings; never persisted.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; KEY_LENGTH],
}

impl SecretKey {
    /// Create a secret key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

/// Salt for master password hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salt(pub [u8; 32]);

impl Salt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}
