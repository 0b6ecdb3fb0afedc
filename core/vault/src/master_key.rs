//! Master password hash persistence and validation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::context::{from_record, to_record, VaultContext, MASTER_KEY_COLLECTION};
use keyhaven_common::{EntryKey, Error, Result};
use keyhaven_crypto::{hash_master_password, KdfParams, MasterKeyHash, Salt};
use keyhaven_storage::VaultStore;

/// Identifier of the single master key record within its collection.
const MASTER_RECORD_ID: &str = "master";

/// The persisted master key material.
///
/// Holds only a one-way hash of the master password, never the password
/// itself. Overwritten whole on every set; the salt and KDF parameters are
/// stored alongside so validation always replays the exact derivation used
/// at set time.
#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct MasterKeyRecord {
    pub salt: Salt,
    pub kdf_params: KdfParams,
    pub hash: MasterKeyHash,
}

/// Sole owner of the master key record.
///
/// Every encrypt/decrypt path in the vault services reads its key material
/// through this store; nothing else touches the `master_key` collection.
pub struct MasterKeyStore {
    ctx: Arc<VaultContext>,
    kdf_params: KdfParams,
}

impl MasterKeyStore {
    /// Create a store with default (interactive) KDF parameters.
    pub fn new(ctx: Arc<VaultContext>) -> Self {
        Self::with_params(ctx, KdfParams::default())
    }

    /// Create a store with explicit KDF parameters.
    ///
    /// The parameters apply to newly set passwords; validation of an
    /// existing record always uses the parameters stored with it.
    pub fn with_params(ctx: Arc<VaultContext>, kdf_params: KdfParams) -> Self {
        Self { ctx, kdf_params }
    }

    /// Set the master password, unconditionally overwriting any prior one.
    ///
    /// No side effect on already-encrypted vault data: callers must go
    /// through [`crate::RotationCoordinator`] if existing secrets are to
    /// remain readable.
    ///
    /// # Errors
    /// - `InvalidInput` if the password is empty
    pub async fn set_master_password(&self, password: &str) -> Result<()> {
        let record = self.prepare_record(password)?;

        let _guard = self.ctx.write_guard().await;
        self.store_record(&record).await?;

        info!("Master password set");
        Ok(())
    }

    /// Get the current master key hash.
    ///
    /// # Errors
    /// - `MasterKeyNotConfigured` if no master password was ever set
    pub async fn master_key_hash(&self) -> Result<MasterKeyHash> {
        Ok(self.load_record().await?.hash)
    }

    /// Check a plaintext password against the stored hash.
    ///
    /// Re-hashes with the stored salt and parameters and compares in
    /// constant time. Never decrypts any vault data.
    ///
    /// # Errors
    /// - `MasterKeyNotConfigured` if no master password was ever set
    pub async fn validate(&self, password: &str) -> Result<bool> {
        let record = self.load_record().await?;

        if password.is_empty() {
            // An empty password can never have been set
            return Ok(false);
        }

        let candidate =
            hash_master_password(password.as_bytes(), &record.salt, &record.kdf_params)?;
        Ok(candidate.ct_eq(&record.hash))
    }

    /// Build a fresh record for a password without persisting it.
    ///
    /// Rotation uses this to stage the new master material and only
    /// persists it after both vaults have been re-keyed.
    pub(crate) fn prepare_record(&self, password: &str) -> Result<MasterKeyRecord> {
        let salt = Salt::generate();
        let hash = hash_master_password(password.as_bytes(), &salt, &self.kdf_params)?;

        Ok(MasterKeyRecord {
            salt,
            kdf_params: self.kdf_params.clone(),
            hash,
        })
    }

    /// Load the stored record.
    pub(crate) async fn load_record(&self) -> Result<MasterKeyRecord> {
        let id = EntryKey::normalize(MASTER_RECORD_ID)?;

        match self.ctx.store().get(MASTER_KEY_COLLECTION, &id).await {
            Ok(bytes) => from_record(&bytes),
            Err(Error::NotFound(_)) => Err(Error::MasterKeyNotConfigured),
            Err(e) => Err(e),
        }
    }

    /// Persist a record, overwriting any prior one.
    ///
    /// Caller must hold the write lock.
    pub(crate) async fn store_record(&self, record: &MasterKeyRecord) -> Result<()> {
        let id = EntryKey::normalize(MASTER_RECORD_ID)?;
        self.ctx
            .store()
            .put(MASTER_KEY_COLLECTION, &id, to_record(record)?)
            .await
    }
}
