//! Login entry service.

use std::sync::Arc;
use tracing::{debug, info};

use crate::context::{from_record, to_record, VaultContext, LOGINS_COLLECTION};
use crate::entry::LoginEntry;
use crate::master_key::MasterKeyStore;
use crate::metrics::SystemMetrics;
use crate::secret::{decrypt_field, encrypt_field, resolve_incoming};
use keyhaven_common::{EntryKey, Error, Result};
use keyhaven_crypto::MasterKeyHash;
use keyhaven_storage::VaultStore;

/// CRUD and conflict rules for login entries.
///
/// Account passwords are encrypted under keys bound to the context
/// `[entry_name, username]`, both captured at encryption time. Listing and
/// fetching return ciphertext; decryption only happens through
/// [`LoginVaultService::get_decrypted_account_password`].
pub struct LoginVaultService {
    ctx: Arc<VaultContext>,
    master_keys: MasterKeyStore,
}

impl LoginVaultService {
    /// Create the service over a vault context.
    pub fn new(ctx: Arc<VaultContext>) -> Self {
        let master_keys = MasterKeyStore::new(ctx.clone());
        Self { ctx, master_keys }
    }

    /// Add a new login entry, encrypting every account password.
    ///
    /// # Errors
    /// - `MasterKeyNotConfigured` if no master password is set
    /// - `DuplicateName` if an entry with the same normalized name exists
    /// - `DuplicateAccount` if two input accounts share a username
    pub async fn add(&self, entry: LoginEntry) -> Result<()> {
        entry.validate()?;
        let master = self.master_keys.master_key_hash().await?;
        let key = entry.key()?;

        debug!(entry = %key, "Adding login entry");

        let _guard = self.ctx.write_guard().await;

        match self.ctx.store().get(LOGINS_COLLECTION, &key).await {
            Ok(_) => return Err(Error::DuplicateName(entry.name.clone())),
            Err(Error::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let sealed = seal_accounts(&master, entry)?;
        self.ctx
            .store()
            .put(LOGINS_COLLECTION, &key, to_record(&sealed)?)
            .await?;

        let mut metrics = SystemMetrics::load(&self.ctx).await?;
        metrics.login_count += 1;
        metrics.save(&self.ctx).await?;

        info!(entry = %key, accounts = sealed.accounts.len(), "Login entry added");
        Ok(())
    }

    /// Fetch one entry by name. Account passwords stay ciphertext.
    pub async fn get(&self, name: &str) -> Result<LoginEntry> {
        let key = EntryKey::normalize(name)?;
        let bytes = self.ctx.store().get(LOGINS_COLLECTION, &key).await?;
        from_record(&bytes)
    }

    /// Fetch every entry. Account passwords stay ciphertext.
    pub async fn get_all(&self) -> Result<Vec<LoginEntry>> {
        let records = self.ctx.store().get_all(LOGINS_COLLECTION).await?;
        records.iter().map(|bytes| from_record(bytes)).collect()
    }

    /// Decrypt and return one account password.
    ///
    /// # Errors
    /// - `NotFound` if the entry or the account does not exist
    /// - `CryptoAuthFailure` if the stored ciphertext does not authenticate
    pub async fn get_decrypted_account_password(
        &self,
        entry_name: &str,
        username: &str,
    ) -> Result<String> {
        let master = self.master_keys.master_key_hash().await?;
        let entry = self.get(entry_name).await?;

        let account = entry.account(username).ok_or_else(|| {
            Error::NotFound(format!(
                "Account '{}' in entry '{}'",
                username, entry.name
            ))
        })?;

        decrypt_field(&master, &[&entry.name, &account.username], &account.password)
    }

    /// Update an entry, possibly renaming it.
    ///
    /// Incoming account passwords are expected as the ciphertext previously
    /// returned by this service; each is decrypted under the stored entry's
    /// context and re-encrypted under the new one, so renames keep every
    /// secret decryptable. Values that are not valid ciphertext are taken
    /// as new plaintext passwords.
    ///
    /// # Errors
    /// - `NotFound` if no entry exists under `old_name`
    /// - `DuplicateName` if renaming onto an existing entry
    /// - `DuplicateAccount` as in [`LoginVaultService::add`]
    pub async fn update(&self, old_name: &str, new_entry: LoginEntry) -> Result<()> {
        new_entry.validate()?;
        let master = self.master_keys.master_key_hash().await?;
        let old_key = EntryKey::normalize(old_name)?;
        let new_key = new_entry.key()?;

        debug!(from = %old_key, to = %new_key, "Updating login entry");

        let _guard = self.ctx.write_guard().await;

        let current: LoginEntry =
            from_record(&self.ctx.store().get(LOGINS_COLLECTION, &old_key).await?)?;

        let renamed = old_key != new_key;
        if renamed {
            match self.ctx.store().get(LOGINS_COLLECTION, &new_key).await {
                Ok(_) => return Err(Error::DuplicateName(new_entry.name.clone())),
                Err(Error::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        // Recover plaintext under the context the secrets were issued with
        // (the stored entry's name, not the caller-supplied spelling), then
        // re-encrypt under the new context.
        let mut sealed = new_entry;
        for account in &mut sealed.accounts {
            let plaintext = resolve_incoming(
                &master,
                &[&current.name, &account.username],
                &account.password,
            )?;
            account.password =
                encrypt_field(&master, &[&sealed.name, &account.username], &plaintext)?;
        }

        if renamed {
            self.ctx.store().delete(LOGINS_COLLECTION, &old_key).await?;
        }
        self.ctx
            .store()
            .put(LOGINS_COLLECTION, &new_key, to_record(&sealed)?)
            .await?;

        info!(entry = %new_key, renamed, "Login entry updated");
        Ok(())
    }

    /// Delete an entry.
    ///
    /// # Errors
    /// - `NotFound` if no entry exists under `name` (explicit feedback
    ///   rather than silent success)
    pub async fn delete(&self, name: &str) -> Result<()> {
        let key = EntryKey::normalize(name)?;

        let _guard = self.ctx.write_guard().await;

        self.ctx.store().delete(LOGINS_COLLECTION, &key).await?;

        let mut metrics = SystemMetrics::load(&self.ctx).await?;
        metrics.login_count = metrics.login_count.saturating_sub(1);
        metrics.save(&self.ctx).await?;

        info!(entry = %key, "Login entry deleted");
        Ok(())
    }
}

/// Encrypt every account password of a plaintext entry in place.
fn seal_accounts(master: &MasterKeyHash, mut entry: LoginEntry) -> Result<LoginEntry> {
    let name = entry.name.clone();
    for account in &mut entry.accounts {
        account.password = encrypt_field(master, &[&name, &account.username], &account.password)?;
    }
    Ok(entry)
}
