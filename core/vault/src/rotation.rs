//! Master password rotation.

use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::context::{from_record, to_record, VaultContext, LOGINS_COLLECTION, NOTES_COLLECTION};
use crate::entry::{LoginEntry, NoteEntry};
use crate::master_key::MasterKeyStore;
use crate::secret::{decrypt_field, encrypt_field};
use keyhaven_common::{Error, Result};
use keyhaven_crypto::{hash_master_password, KdfParams};
use keyhaven_storage::VaultStore;

/// Orchestrates a master password change.
///
/// Every secret in both vaults is decrypted under the old master key hash
/// and re-encrypted under the new one. The operation is two-phase: nothing
/// is written back until every secret of BOTH vaults has been recovered,
/// and the master key record itself is replaced last. A failure at any
/// point before the first write leaves the vault byte-identical, so old
/// ciphertext stays decryptable on retry.
pub struct RotationCoordinator {
    ctx: Arc<VaultContext>,
    master_keys: MasterKeyStore,
}

impl RotationCoordinator {
    /// Create a coordinator with default KDF parameters for the new hash.
    pub fn new(ctx: Arc<VaultContext>) -> Self {
        Self::with_params(ctx, KdfParams::default())
    }

    /// Create a coordinator with explicit KDF parameters.
    pub fn with_params(ctx: Arc<VaultContext>, kdf_params: KdfParams) -> Self {
        let master_keys = MasterKeyStore::with_params(ctx.clone(), kdf_params);
        Self { ctx, master_keys }
    }

    /// Rotate the master password.
    ///
    /// Holds the global write lock for the entire duration: a concurrent
    /// add or update under the old key context mid-rotation would be
    /// re-encrypted inconsistently or lost.
    ///
    /// # Errors
    /// - `MasterKeyNotConfigured` if no master password was ever set
    /// - `InvalidOldPassword` if `old_password` does not match
    /// - `RotationFailed` if any secret fails to decrypt; no record has
    ///   been written in that case and the master key is unchanged
    pub async fn rotate(&self, old_password: &str, new_password: &str) -> Result<()> {
        let _guard = self.ctx.write_guard().await;

        let record = self.master_keys.load_record().await?;

        if old_password.is_empty() {
            return Err(Error::InvalidOldPassword);
        }
        let candidate =
            hash_master_password(old_password.as_bytes(), &record.salt, &record.kdf_params)?;
        if !candidate.ct_eq(&record.hash) {
            return Err(Error::InvalidOldPassword);
        }

        let old_hash = record.hash.clone();
        let new_record = self.master_keys.prepare_record(new_password)?;

        debug!("Starting master password rotation");

        // Decrypt phase: recover every plaintext before writing anything.
        let mut logins = Vec::new();
        for bytes in self.ctx.store().get_all(LOGINS_COLLECTION).await? {
            let entry: LoginEntry = from_record(&bytes)?;
            let key = entry.key()?;

            let mut passwords = Vec::with_capacity(entry.accounts.len());
            for account in &entry.accounts {
                let plaintext = decrypt_field(
                    &old_hash,
                    &[&entry.name, &account.username],
                    &account.password,
                )
                .map_err(|_| {
                    Error::RotationFailed(format!(
                        "login entry '{}', account '{}' could not be decrypted; \
                         vault left unmodified",
                        entry.name, account.username
                    ))
                })?;
                passwords.push(Zeroizing::new(plaintext));
            }
            logins.push((key, entry, passwords));
        }

        let mut notes = Vec::new();
        for bytes in self.ctx.store().get_all(NOTES_COLLECTION).await? {
            let note: NoteEntry = from_record(&bytes)?;
            let key = note.key()?;

            let plaintext =
                decrypt_field(&old_hash, &[&note.created_date_time], &note.content).map_err(
                    |_| {
                        Error::RotationFailed(format!(
                            "note '{}' could not be decrypted; vault left unmodified",
                            note.created_date_time
                        ))
                    },
                )?;
            notes.push((key, note, Zeroizing::new(plaintext)));
        }

        let login_count = logins.len();
        let note_count = notes.len();

        // Write phase: re-encrypt under the new hash and put everything
        // back. The contexts are unchanged; only the master hash moves.
        for (key, mut entry, passwords) in logins {
            self.reseal_login(&new_record.hash, &mut entry, &passwords)?;
            self.ctx
                .store()
                .put(LOGINS_COLLECTION, &key, to_record(&entry)?)
                .await?;
        }

        for (key, mut note, plaintext) in notes {
            note.content =
                encrypt_field(&new_record.hash, &[&note.created_date_time], &plaintext)?;
            self.ctx
                .store()
                .put(NOTES_COLLECTION, &key, to_record(&note)?)
                .await?;
        }

        // Master record last: until this point the old password still
        // decrypts everything on disk.
        self.master_keys.store_record(&new_record).await?;

        info!(
            logins = login_count,
            notes = note_count,
            "Master password rotated"
        );
        Ok(())
    }

    fn reseal_login(
        &self,
        new_hash: &keyhaven_crypto::MasterKeyHash,
        entry: &mut LoginEntry,
        passwords: &[Zeroizing<String>],
    ) -> Result<()> {
        let name = entry.name.clone();
        for (account, plaintext) in entry.accounts.iter_mut().zip(passwords) {
            account.password =
                encrypt_field(new_hash, &[&name, &account.username], plaintext)?;
        }
        Ok(())
    }
}
