//! Note entry service.

use std::sync::Arc;
use tracing::{debug, info};

use crate::context::{from_record, to_record, VaultContext, NOTES_COLLECTION};
use crate::entry::NoteEntry;
use crate::master_key::MasterKeyStore;
use crate::secret::{decrypt_field, encrypt_field, resolve_incoming};
use keyhaven_common::{EntryKey, Error, Result};
use keyhaven_storage::VaultStore;

/// CRUD and conflict rules for notes.
///
/// Mirrors [`crate::LoginVaultService`] with a single secret field
/// (`content`) and a single context part: the note's `created_date_time`,
/// which is also its immutable primary key. Because the identifier never
/// changes, the encryption context for a note is stable for its lifetime.
pub struct NoteVaultService {
    ctx: Arc<VaultContext>,
    master_keys: MasterKeyStore,
}

impl NoteVaultService {
    /// Create the service over a vault context.
    pub fn new(ctx: Arc<VaultContext>) -> Self {
        let master_keys = MasterKeyStore::new(ctx.clone());
        Self { ctx, master_keys }
    }

    /// Add a new note, encrypting its content.
    ///
    /// # Errors
    /// - `MasterKeyNotConfigured` if no master password is set
    /// - `DuplicateName` if a note with the same key already exists
    pub async fn add(&self, note: NoteEntry) -> Result<()> {
        note.validate()?;
        let master = self.master_keys.master_key_hash().await?;
        let key = note.key()?;

        debug!(note = %key, "Adding note");

        let _guard = self.ctx.write_guard().await;

        match self.ctx.store().get(NOTES_COLLECTION, &key).await {
            Ok(_) => return Err(Error::DuplicateName(note.created_date_time.clone())),
            Err(Error::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let mut sealed = note;
        sealed.content = encrypt_field(&master, &[&sealed.created_date_time], &sealed.content)?;

        self.ctx
            .store()
            .put(NOTES_COLLECTION, &key, to_record(&sealed)?)
            .await?;

        info!(note = %key, "Note added");
        Ok(())
    }

    /// Fetch one note by its `created_date_time` key. Content stays
    /// ciphertext.
    pub async fn get(&self, created_date_time: &str) -> Result<NoteEntry> {
        let key = EntryKey::normalize(created_date_time)?;
        let bytes = self.ctx.store().get(NOTES_COLLECTION, &key).await?;
        from_record(&bytes)
    }

    /// Fetch every note. Content stays ciphertext.
    pub async fn get_all(&self) -> Result<Vec<NoteEntry>> {
        let records = self.ctx.store().get_all(NOTES_COLLECTION).await?;
        records.iter().map(|bytes| from_record(bytes)).collect()
    }

    /// Decrypt and return a note's content.
    ///
    /// # Errors
    /// - `NotFound` if the note does not exist
    /// - `CryptoAuthFailure` if the stored ciphertext does not authenticate
    pub async fn get_decrypted_content(&self, created_date_time: &str) -> Result<String> {
        let master = self.master_keys.master_key_hash().await?;
        let note = self.get(created_date_time).await?;

        decrypt_field(&master, &[&note.created_date_time], &note.content)
    }

    /// Update a note in place.
    ///
    /// The key is immutable, so the context never moves; incoming content
    /// is decrypted if it was submitted as previously-returned ciphertext,
    /// taken as new plaintext otherwise, and re-encrypted before persisting.
    ///
    /// # Errors
    /// - `NotFound` if no note exists under the note's key
    pub async fn update(&self, note: NoteEntry) -> Result<()> {
        note.validate()?;
        let master = self.master_keys.master_key_hash().await?;
        let key = note.key()?;

        debug!(note = %key, "Updating note");

        let _guard = self.ctx.write_guard().await;

        // Must already exist; the key carries identity, so there is no
        // rename path for notes.
        self.ctx.store().get(NOTES_COLLECTION, &key).await?;

        let mut sealed = note;
        let plaintext =
            resolve_incoming(&master, &[&sealed.created_date_time], &sealed.content)?;
        sealed.content = encrypt_field(&master, &[&sealed.created_date_time], &plaintext)?;

        self.ctx
            .store()
            .put(NOTES_COLLECTION, &key, to_record(&sealed)?)
            .await?;

        info!(note = %key, "Note updated");
        Ok(())
    }

    /// Delete a note.
    ///
    /// # Errors
    /// - `NotFound` if no note exists under `created_date_time`
    pub async fn delete(&self, created_date_time: &str) -> Result<()> {
        let key = EntryKey::normalize(created_date_time)?;

        let _guard = self.ctx.write_guard().await;
        self.ctx.store().delete(NOTES_COLLECTION, &key).await?;

        info!(note = %key, "Note deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyhaven_common::EntryAttributes;
    use keyhaven_crypto::KdfParams;
    use keyhaven_storage::MemoryStore;

    async fn test_service() -> NoteVaultService {
        let ctx = VaultContext::new(Arc::new(MemoryStore::new()));
        MasterKeyStore::with_params(ctx.clone(), KdfParams::moderate())
            .set_master_password("12345")
            .await
            .unwrap();
        NoteVaultService::new(ctx)
    }

    fn note() -> NoteEntry {
        NoteEntry::new(
            "2024-01-01T10:00:00",
            "wifi",
            "the wifi password is hunter2",
            EntryAttributes::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_encrypts_content() {
        let service = test_service().await;
        service.add(note()).await.unwrap();

        let stored = service.get("2024-01-01T10:00:00").await.unwrap();
        assert_eq!(stored.title, "wifi");
        assert_ne!(stored.content, "the wifi password is hunter2");
    }

    #[tokio::test]
    async fn test_add_duplicate_key_rejected() {
        let service = test_service().await;
        service.add(note()).await.unwrap();

        let result = service.add(note()).await;
        assert!(matches!(result, Err(Error::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_add_requires_master_key() {
        let ctx = VaultContext::new(Arc::new(MemoryStore::new()));
        let service = NoteVaultService::new(ctx);

        let result = service.add(note()).await;
        assert!(matches!(result, Err(Error::MasterKeyNotConfigured)));
    }

    #[tokio::test]
    async fn test_get_decrypted_content() {
        let service = test_service().await;
        service.add(note()).await.unwrap();

        let content = service
            .get_decrypted_content("2024-01-01T10:00:00")
            .await
            .unwrap();
        assert_eq!(content, "the wifi password is hunter2");
    }

    #[tokio::test]
    async fn test_update_roundtrips_ciphertext() {
        let service = test_service().await;
        service.add(note()).await.unwrap();

        // Submit back exactly as returned: content must survive unchanged
        let stored = service.get("2024-01-01T10:00:00").await.unwrap();
        service.update(stored).await.unwrap();

        assert_eq!(
            service
                .get_decrypted_content("2024-01-01T10:00:00")
                .await
                .unwrap(),
            "the wifi password is hunter2"
        );
    }

    #[tokio::test]
    async fn test_update_with_new_plaintext() {
        let service = test_service().await;
        service.add(note()).await.unwrap();

        let mut stored = service.get("2024-01-01T10:00:00").await.unwrap();
        stored.content = "rotated to hunter3".to_string();
        service.update(stored).await.unwrap();

        assert_eq!(
            service
                .get_decrypted_content("2024-01-01T10:00:00")
                .await
                .unwrap(),
            "rotated to hunter3"
        );
    }

    #[tokio::test]
    async fn test_update_missing_note_not_found() {
        let service = test_service().await;

        let result = service.update(note()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = test_service().await;
        service.add(note()).await.unwrap();

        service.delete("2024-01-01T10:00:00").await.unwrap();

        assert!(matches!(
            service.get("2024-01-01T10:00:00").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.delete("2024-01-01T10:00:00").await,
            Err(Error::NotFound(_))
        ));
    }
}
