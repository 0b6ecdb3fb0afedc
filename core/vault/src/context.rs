//! Shared vault context.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use keyhaven_common::{Error, Result};
use keyhaven_storage::VaultStore;

/// Collection holding encrypted login entries.
pub(crate) const LOGINS_COLLECTION: &str = "logins";

/// Collection holding encrypted note entries.
pub(crate) const NOTES_COLLECTION: &str = "notes";

/// Collection holding the single master key record.
pub(crate) const MASTER_KEY_COLLECTION: &str = "master_key";

/// Collection holding the system metrics record.
pub(crate) const SYSTEM_COLLECTION: &str = "system";

/// Explicit dependency context threaded through every vault service.
///
/// Owns the store handle and the global write lock. Constructed once at
/// startup; services hold an `Arc` to it instead of reaching for any
/// process-wide state.
///
/// The write lock serializes every mutating operation. Rotation holds it
/// for its entire duration, since a concurrent add under the old key
/// context mid-rotation would be re-encrypted inconsistently or lost.
/// Reads of ciphertext records run unlocked: records are immutable
/// between writes.
pub struct VaultContext {
    store: Arc<dyn VaultStore>,
    write_lock: Mutex<()>,
}

impl VaultContext {
    /// Create a context around a store handle.
    pub fn new(store: Arc<dyn VaultStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            write_lock: Mutex::new(()),
        })
    }

    /// Get the store handle.
    pub fn store(&self) -> &Arc<dyn VaultStore> {
        &self.store
    }

    /// Acquire the global write lock.
    ///
    /// Held for the duration of any mutating operation.
    pub(crate) async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}

/// Serialize a record for storage.
pub(crate) fn to_record<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Deserialize a stored record.
pub(crate) fn from_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
}
