//! System metrics record.

use serde::{Deserialize, Serialize};

use crate::context::{from_record, to_record, VaultContext, SYSTEM_COLLECTION};
use keyhaven_common::{EntryKey, Error, Result};
use keyhaven_storage::VaultStore;

const METRICS_RECORD_ID: &str = "metrics";

/// Vault-wide counters maintained by the services.
///
/// Stored as a single record in the `system` collection; absent record
/// reads as all-zero. The boundary layer reads this for display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Number of login entries currently stored.
    pub login_count: u64,
}

impl SystemMetrics {
    /// Load the current metrics record.
    pub async fn load(ctx: &VaultContext) -> Result<Self> {
        let id = EntryKey::normalize(METRICS_RECORD_ID)?;

        match ctx.store().get(SYSTEM_COLLECTION, &id).await {
            Ok(bytes) => from_record(&bytes),
            Err(Error::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Persist the metrics record. Caller must hold the write lock.
    pub(crate) async fn save(&self, ctx: &VaultContext) -> Result<()> {
        let id = EntryKey::normalize(METRICS_RECORD_ID)?;
        ctx.store()
            .put(SYSTEM_COLLECTION, &id, to_record(self)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyhaven_storage::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_record_reads_as_zero() {
        let ctx = VaultContext::new(Arc::new(MemoryStore::new()));
        let metrics = SystemMetrics::load(&ctx).await.unwrap();

        assert_eq!(metrics.login_count, 0);
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let ctx = VaultContext::new(Arc::new(MemoryStore::new()));

        let metrics = SystemMetrics { login_count: 3 };
        metrics.save(&ctx).await.unwrap();

        assert_eq!(SystemMetrics::load(&ctx).await.unwrap(), metrics);
    }
}
