//! Common types used throughout Keyhaven.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized identifier for a stored vault record.
///
/// Entry lookups are case-insensitive: records are keyed by the uppercased
/// entry name, and every path into the store goes through this type so the
/// normalization cannot be skipped. The original mixed-case name lives
/// inside the stored record itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey(String);

impl EntryKey {
    /// Normalize a raw entry name into a storage key.
    ///
    /// # Preconditions
    /// - `name` must be non-empty
    ///
    /// # Errors
    /// - Returns error if the name is empty or whitespace-only
    pub fn normalize(name: &str) -> crate::Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Entry name cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Get the normalized key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-entry display and policy flags.
///
/// These are plaintext metadata, stored alongside the ciphertext fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAttributes {
    /// Entry is pinned in favourites listings.
    pub is_favourite: bool,
    /// Boundary layer must re-prompt for the master password before
    /// revealing this entry's secrets.
    pub require_master_password: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_uppercases() {
        let key = EntryKey::normalize("github").unwrap();
        assert_eq!(key.as_str(), "GITHUB");
    }

    #[test]
    fn test_entry_key_case_insensitive_equality() {
        let a = EntryKey::normalize("GitHub").unwrap();
        let b = EntryKey::normalize("gitHUB").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_entry_key_trims_whitespace() {
        let key = EntryKey::normalize("  email  ").unwrap();
        assert_eq!(key.as_str(), "EMAIL");
    }

    #[test]
    fn test_entry_key_empty_fails() {
        assert!(EntryKey::normalize("").is_err());
        assert!(EntryKey::normalize("   ").is_err());
    }

    #[test]
    fn test_attributes_default() {
        let attrs = EntryAttributes::default();
        assert!(!attrs.is_favourite);
        assert!(!attrs.require_master_password);
    }
}
