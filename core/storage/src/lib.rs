//! Record store abstraction for Keyhaven.
//!
//! This crate provides a trait-based interface over namespaced key/value
//! collections and two concrete backends: an in-memory store for tests and
//! an embedded SQLite store for production use.
//!
//! # Design Principles
//! - No encryption awareness: the store persists whatever serialized record
//!   it is given
//! - Identifiers are normalized (uppercased) by callers before use, making
//!   lookups case-insensitive
//! - Unified error semantics across backends

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::VaultStore;
