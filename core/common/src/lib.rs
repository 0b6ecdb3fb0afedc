//! Common types shared across the Keyhaven workspace.
//!
//! This crate provides the error enum every other crate returns and the
//! foundational identifier types the storage and vault layers agree on.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{EntryAttributes, EntryKey};
