//! Authenticated encryption using XChaCha20-Poly1305.
//!
//! XChaCha20-Poly1305 provides both confidentiality and authenticity,
//! with a 24-byte nonce that is safe for random generation.

use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, AeadCore, KeyInit, OsRng},
    XChaCha20Poly1305,
};

use crate::keys::SecretKey;
use keyhaven_common::{Error, Result};

/// Nonce size for XChaCha20-Poly1305 (24 bytes).
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Encrypt a secret field using XChaCha20-Poly1305.
///
/// # Postconditions
/// - Returns nonce || ciphertext || tag
/// - The nonce is freshly random, so encrypting identical plaintext twice
///   under the same key yields different ciphertext
///
/// # Errors
/// - Returns error if encryption fails
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    // Prepend nonce to ciphertext
    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypt a secret field using XChaCha20-Poly1305.
///
/// # Preconditions
/// - `ciphertext` must be at least NONCE_SIZE + TAG_SIZE bytes
/// - Ciphertext format: nonce || encrypted_data || tag
///
/// # Errors
/// - `Error::Crypto` if the ciphertext is structurally too short
/// - `Error::CryptoAuthFailure` if the authentication tag does not verify:
///   wrong key, stale encryption context, or tampered data. The plaintext
///   is never returned in that case.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::Crypto("Ciphertext too short".to_string()));
    }

    let (nonce_bytes, encrypted) = ciphertext.split_at(NONCE_SIZE);
    let nonce = GenericArray::from_slice(nonce_bytes);

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));

    cipher
        .decrypt(nonce, encrypted)
        .map_err(|_| Error::CryptoAuthFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KEY_LENGTH;
    use proptest::prelude::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = SecretKey::from_bytes([42u8; KEY_LENGTH]);
        let plaintext = b"hunter2";

        let ciphertext = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_ciphertext_size() {
        let key = SecretKey::from_bytes([42u8; KEY_LENGTH]);
        let plaintext = b"Test message";

        let ciphertext = encrypt(&key, plaintext).unwrap();

        // Size should be nonce + plaintext + tag
        assert_eq!(ciphertext.len(), NONCE_SIZE + plaintext.len() + TAG_SIZE);
    }

    #[test]
    fn test_different_nonce_each_time() {
        let key = SecretKey::from_bytes([42u8; KEY_LENGTH]);
        let plaintext = b"Same plaintext";

        let ct1 = encrypt(&key, plaintext).unwrap();
        let ct2 = encrypt(&key, plaintext).unwrap();

        // Nonces should be different
        assert_ne!(&ct1[..NONCE_SIZE], &ct2[..NONCE_SIZE]);
        // Ciphertexts should be different
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn test_wrong_key_fails_auth() {
        let key1 = SecretKey::from_bytes([1u8; KEY_LENGTH]);
        let key2 = SecretKey::from_bytes([2u8; KEY_LENGTH]);
        let plaintext = b"Secret data";

        let ciphertext = encrypt(&key1, plaintext).unwrap();
        let result = decrypt(&key2, &ciphertext);

        assert!(matches!(result, Err(Error::CryptoAuthFailure)));
    }

    #[test]
    fn test_tampered_ciphertext_fails_auth() {
        let key = SecretKey::from_bytes([42u8; KEY_LENGTH]);
        let plaintext = b"Important data";

        let mut ciphertext = encrypt(&key, plaintext).unwrap();
        // Tamper with the ciphertext
        ciphertext[NONCE_SIZE + 5] ^= 0xFF;

        let result = decrypt(&key, &ciphertext);
        assert!(matches!(result, Err(Error::CryptoAuthFailure)));
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let key = SecretKey::from_bytes([42u8; KEY_LENGTH]);
        assert!(decrypt(&key, &[0u8; NONCE_SIZE]).is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        let key = SecretKey::from_bytes([42u8; KEY_LENGTH]);
        let plaintext = b"";

        let ciphertext = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    proptest! {
        #[test]
        fn prop_roundtrip_any_plaintext(
            key_bytes in prop::array::uniform32(any::<u8>()),
            plaintext in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            let key = SecretKey::from_bytes(key_bytes);
            let ciphertext = encrypt(&key, &plaintext).unwrap();
            prop_assert_eq!(decrypt(&key, &ciphertext).unwrap(), plaintext);
        }
    }
}
