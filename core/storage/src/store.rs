//! Vault store trait definition.

use async_trait::async_trait;

use keyhaven_common::{EntryKey, Result};

/// Persistence contract over namespaced record collections.
///
/// Each collection ("logins", "notes", "master_key", "system") holds
/// serialized records keyed by a normalized [`EntryKey`]. The store has no
/// knowledge of encryption or record structure; services hand it opaque
/// bytes.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Fetch one record.
    ///
    /// # Errors
    /// - `Error::NotFound` if no record exists under `id`
    async fn get(&self, collection: &str, id: &EntryKey) -> Result<Vec<u8>>;

    /// Fetch every record in a collection, in stable key order.
    ///
    /// An unknown or empty collection yields an empty vector, not an error.
    async fn get_all(&self, collection: &str) -> Result<Vec<Vec<u8>>>;

    /// Insert or overwrite a record (upsert).
    async fn put(&self, collection: &str, id: &EntryKey, record: Vec<u8>) -> Result<()>;

    /// Remove a record.
    ///
    /// # Errors
    /// - `Error::NotFound` if no record exists under `id`
    async fn delete(&self, collection: &str, id: &EntryKey) -> Result<()>;
}
