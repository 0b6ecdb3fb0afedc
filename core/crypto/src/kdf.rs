//! Master password hashing and entry key derivation.
//!
//! Two distinct derivations live here:
//! - Argon2id turns the user's master password into the stored
//!   [`MasterKeyHash`], memory-hard against offline guessing.
//! - Blake2b turns that hash plus entry-identifying context strings into
//!   the per-secret symmetric key, cheap and deterministic so decryption
//!   can re-derive it independently.

use argon2::{Algorithm, Argon2, Params, Version};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use crate::keys::{MasterKeyHash, Salt, SecretKey, KEY_LENGTH};
use keyhaven_common::{Error, Result};

/// Parameters for Argon2id password hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (e.g., 65536 = 64 MiB).
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl KdfParams {
    /// Create parameters suitable for interactive use.
    ///
    /// These parameters provide a balance between security and usability,
    /// targeting approximately 0.5-1 second of hashing time.
    pub fn interactive() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }

    /// Create parameters suitable for sensitive data.
    ///
    /// Higher security parameters that may take several seconds.
    pub fn sensitive() -> Self {
        Self {
            memory_cost: 262144, // 256 MiB
            time_cost: 4,
            parallelism: 4,
        }
    }

    /// Create moderate parameters for constrained devices and tests.
    pub fn moderate() -> Self {
        Self {
            memory_cost: 32768, // 32 MiB
            time_cost: 3,
            parallelism: 2,
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Hash a master password with Argon2id.
///
/// # Preconditions
/// - `password` must not be empty
///
/// # Postconditions
/// - The hash is deterministic given the same password, salt and params
///
/// # Errors
/// - Returns error if password is empty
/// - Returns error if Argon2id parameters are invalid
pub fn hash_master_password(
    password: &[u8],
    salt: &Salt,
    params: &KdfParams,
) -> Result<MasterKeyHash> {
    if password.is_empty() {
        return Err(Error::InvalidInput("Password cannot be empty".to_string()));
    }

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map_err(|e| Error::Crypto(format!("Invalid KDF parameters: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut hash_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(password, salt.as_bytes(), &mut hash_bytes)
        .map_err(|e| Error::Crypto(format!("Password hashing failed: {}", e)))?;

    Ok(MasterKeyHash::from_bytes(hash_bytes))
}

/// Derive the symmetric key for one secret field.
///
/// Digests the master key hash followed by each context part in order,
/// with no separator, through Blake2b-256. For a login account the context
/// is `[entry_name, username]`; for a note it is `[created_date_time]`.
///
/// Because the entry identifier is baked into the key, renaming an entry
/// invalidates the keys of its secrets: any rename path must decrypt under
/// the old context before re-encrypting under the new one.
pub fn derive_entry_key(master: &MasterKeyHash, context_parts: &[&str]) -> SecretKey {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(master.as_bytes());
    for part in context_parts {
        hasher.update(part.as_bytes());
    }

    let result = hasher.finalize();
    let mut derived = [0u8; KEY_LENGTH];
    derived.copy_from_slice(&result);
    SecretKey::from_bytes(derived)
}
