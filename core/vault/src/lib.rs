//! Vault services for Keyhaven.
//!
//! This crate implements the encryption and consistency layer of the
//! credential vault:
//! - Master password hash persistence and validation
//! - Login and note entry CRUD with uniqueness/conflict rules
//! - Per-secret context-bound encryption of passwords and note content
//! - Whole-vault re-keying when the master password changes
//!
//! # Architecture
//! Services are constructed around an explicit [`VaultContext`] that owns
//! the store handle and the global write lock; there is no process-wide
//! state. Decrypted plaintext is only ever returned from the explicit
//! decrypt operations and is never persisted or cached.

pub mod context;
pub mod entry;
pub mod logins;
pub mod master_key;
pub mod metrics;
pub mod notes;
pub mod rotation;
mod secret;

pub use context::VaultContext;
pub use entry::{Account, LoginEntry, NoteEntry};
pub use logins::LoginVaultService;
pub use master_key::MasterKeyStore;
pub use metrics::SystemMetrics;
pub use notes::NoteVaultService;
pub use rotation::RotationCoordinator;
