//! Typed vault entry structures.
//!
//! Entries are constructed through validating constructors that fail fast
//! on missing or malformed fields. Secret fields (`Account::password`,
//! `NoteEntry::content`) hold base64 ciphertext once an entry has passed
//! through a vault service; they only hold plaintext transiently on the
//! way in.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use keyhaven_common::{EntryAttributes, EntryKey, Error, Result};

/// One username/password pair inside a login entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account username. Unique within its entry (case-sensitive).
    pub username: String,
    /// Account password: plaintext on input, base64 ciphertext at rest
    /// and on output.
    pub password: String,
}

impl Account {
    /// Create an account.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A stored login entry.
///
/// Entry names are unique across the vault under case-insensitive
/// comparison; the record is keyed by the uppercased name while this
/// struct keeps the original spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEntry {
    /// Display name, also the identity of the entry.
    pub name: String,
    /// Site URL (plaintext metadata).
    pub url: String,
    /// Display and policy flags.
    #[serde(default)]
    pub attributes: EntryAttributes,
    /// Ordered accounts belonging to this entry.
    pub accounts: Vec<Account>,
}

impl LoginEntry {
    /// Create a validated login entry.
    ///
    /// # Errors
    /// - `InvalidInput` if the name is empty or an account username is empty
    /// - `DuplicateAccount` if two accounts share a username
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        attributes: EntryAttributes,
        accounts: Vec<Account>,
    ) -> Result<Self> {
        let entry = Self {
            name: name.into(),
            url: url.into(),
            attributes,
            accounts,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the entry invariants.
    ///
    /// Re-run by services on every add/update, since the fields are public
    /// and deserialized entries bypass the constructor.
    pub(crate) fn validate(&self) -> Result<()> {
        EntryKey::normalize(&self.name)?;

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.username.is_empty() {
                return Err(Error::InvalidInput(
                    "Account username cannot be empty".to_string(),
                ));
            }
            if !seen.insert(account.username.as_str()) {
                return Err(Error::DuplicateAccount(account.username.clone()));
            }
        }
        Ok(())
    }

    /// Normalized storage key for this entry.
    pub(crate) fn key(&self) -> Result<EntryKey> {
        EntryKey::normalize(&self.name)
    }

    /// Find an account by exact username match.
    pub fn account(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }
}

/// A stored note entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteEntry {
    /// Creation timestamp string; acts as the immutable primary key.
    pub created_date_time: String,
    /// Note title (plaintext metadata).
    pub title: String,
    /// Note body: plaintext on input, base64 ciphertext at rest and on
    /// output.
    pub content: String,
    /// Display and policy flags.
    #[serde(default)]
    pub attributes: EntryAttributes,
}

impl NoteEntry {
    /// Create a validated note entry.
    ///
    /// # Errors
    /// - `InvalidInput` if `created_date_time` is empty
    pub fn new(
        created_date_time: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        attributes: EntryAttributes,
    ) -> Result<Self> {
        let entry = Self {
            created_date_time: created_date_time.into(),
            title: title.into(),
            content: content.into(),
            attributes,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        EntryKey::normalize(&self.created_date_time)?;
        Ok(())
    }

    /// Normalized storage key for this note.
    pub(crate) fn key(&self) -> Result<EntryKey> {
        EntryKey::normalize(&self.created_date_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_entry_valid() {
        let entry = LoginEntry::new(
            "github",
            "https://github.com",
            EntryAttributes::default(),
            vec![Account::new("abc", "123"), Account::new("pqr", "456")],
        )
        .unwrap();

        assert_eq!(entry.accounts.len(), 2);
        assert_eq!(entry.key().unwrap().as_str(), "GITHUB");
    }

    #[test]
    fn test_login_entry_duplicate_usernames_rejected() {
        let result = LoginEntry::new(
            "github",
            "https://github.com",
            EntryAttributes::default(),
            vec![Account::new("abc", "123"), Account::new("abc", "456")],
        );

        assert!(matches!(result, Err(Error::DuplicateAccount(u)) if u == "abc"));
    }

    #[test]
    fn test_login_entry_usernames_case_sensitive() {
        // "abc" and "ABC" are different accounts by design
        let entry = LoginEntry::new(
            "github",
            "",
            EntryAttributes::default(),
            vec![Account::new("abc", "1"), Account::new("ABC", "2")],
        );

        assert!(entry.is_ok());
    }

    #[test]
    fn test_login_entry_empty_name_rejected() {
        let result = LoginEntry::new("", "", EntryAttributes::default(), vec![]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_account_lookup_exact_match() {
        let entry = LoginEntry::new(
            "github",
            "",
            EntryAttributes::default(),
            vec![Account::new("abc", "1")],
        )
        .unwrap();

        assert!(entry.account("abc").is_some());
        assert!(entry.account("ABC").is_none());
    }

    #[test]
    fn test_note_entry_empty_key_rejected() {
        let result = NoteEntry::new("", "title", "content", EntryAttributes::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
