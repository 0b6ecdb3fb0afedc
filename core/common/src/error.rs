//! Common error types for Keyhaven.

use thiserror::Error;

/// Top-level error type for Keyhaven operations.
///
/// The vault-specific variants (`DuplicateName`, `CryptoAuthFailure`, ...)
/// are deliberately first-class so the boundary layer can map each one to a
/// distinct user-facing failure. Error messages never contain secret
/// plaintext or key material.
#[derive(Debug, Error)]
pub enum Error {
    /// Entry or account does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entry with the same normalized name already exists in the vault.
    #[error("An entry named '{0}' already exists")]
    DuplicateName(String),

    /// Two accounts within one entry share a username.
    #[error("Duplicate account username '{0}' within entry")]
    DuplicateAccount(String),

    /// No master password has ever been set.
    #[error("Master password has not been configured")]
    MasterKeyNotConfigured,

    /// Old master password supplied to rotation does not match.
    #[error("Old master password does not match")]
    InvalidOldPassword,

    /// Authentication tag did not verify: wrong key, stale encryption
    /// context, or tampered ciphertext. Retrying with the same key cannot
    /// succeed.
    #[error("Ciphertext authentication failed")]
    CryptoAuthFailure,

    /// Rotation aborted before any record was written back.
    #[error("Master password rotation failed: {0}")]
    RotationFailed(String),

    /// Cryptographic operation failed for a non-authentication reason.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
