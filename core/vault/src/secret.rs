//! Field-level secret encryption.
//!
//! Glues key derivation, AEAD and base64 together for the single-string
//! secret fields embedded in entry records. The encryption context (entry
//! name, and for accounts also the username) is never persisted; it is
//! recomputed from the entry itself on every call.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroizing;

use keyhaven_common::{Error, Result};
use keyhaven_crypto::{decrypt, derive_entry_key, encrypt, MasterKeyHash};

/// Encrypt one secret field under its context-bound key.
///
/// Returns base64 of nonce || ciphertext || tag, suitable for embedding in
/// a serialized record.
pub(crate) fn encrypt_field(
    master: &MasterKeyHash,
    context: &[&str],
    plaintext: &str,
) -> Result<String> {
    let key = derive_entry_key(master, context);
    let ciphertext = encrypt(&key, plaintext.as_bytes())?;
    Ok(STANDARD.encode(ciphertext))
}

/// Decrypt one secret field, strictly.
///
/// # Errors
/// - `CryptoAuthFailure` if the value is not valid base64 or the
///   authentication tag does not verify (wrong key or stale context)
pub(crate) fn decrypt_field(
    master: &MasterKeyHash,
    context: &[&str],
    encoded: &str,
) -> Result<String> {
    let ciphertext = STANDARD
        .decode(encoded)
        .map_err(|_| Error::CryptoAuthFailure)?;

    let key = derive_entry_key(master, context);
    let plaintext = Zeroizing::new(decrypt(&key, &ciphertext)?);

    String::from_utf8(plaintext.to_vec())
        .map_err(|_| Error::Serialization("Decrypted secret is not valid UTF-8".to_string()))
}

/// Resolve an incoming secret value on update.
///
/// Callers submit entries as previously returned, so a value is normally
/// ciphertext issued under `context`; but a caller setting a new secret
/// submits plaintext instead. A value that does not parse and authenticate
/// as ciphertext is therefore taken verbatim as new plaintext. Errors
/// other than "this is not ciphertext under this context" still propagate.
pub(crate) fn resolve_incoming(
    master: &MasterKeyHash,
    context: &[&str],
    value: &str,
) -> Result<String> {
    match decrypt_field(master, context, value) {
        Ok(plaintext) => Ok(plaintext),
        Err(Error::CryptoAuthFailure) | Err(Error::Crypto(_)) => Ok(value.to_string()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyhaven_crypto::KEY_LENGTH;

    fn master() -> MasterKeyHash {
        MasterKeyHash::from_bytes([9u8; KEY_LENGTH])
    }

    #[test]
    fn test_field_roundtrip() {
        let encoded = encrypt_field(&master(), &["github", "abc"], "123").unwrap();
        let plaintext = decrypt_field(&master(), &["github", "abc"], &encoded).unwrap();

        assert_eq!(plaintext, "123");
        assert_ne!(encoded, "123");
    }

    #[test]
    fn test_stale_context_fails_auth() {
        let encoded = encrypt_field(&master(), &["github", "abc"], "123").unwrap();
        let result = decrypt_field(&master(), &["email", "abc"], &encoded);

        assert!(matches!(result, Err(Error::CryptoAuthFailure)));
    }

    #[test]
    fn test_non_base64_fails_auth() {
        let result = decrypt_field(&master(), &["github", "abc"], "not ciphertext!");
        assert!(matches!(result, Err(Error::CryptoAuthFailure)));
    }

    #[test]
    fn test_resolve_passes_ciphertext_through_decryption() {
        let encoded = encrypt_field(&master(), &["github", "abc"], "123").unwrap();
        let resolved = resolve_incoming(&master(), &["github", "abc"], &encoded).unwrap();

        assert_eq!(resolved, "123");
    }

    #[test]
    fn test_resolve_falls_back_to_plaintext() {
        let resolved = resolve_incoming(&master(), &["github", "abc"], "new-password").unwrap();
        assert_eq!(resolved, "new-password");
    }
}
