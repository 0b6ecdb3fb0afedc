//! Embedded SQLite store.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::store::VaultStore;
use keyhaven_common::{EntryKey, Error, Result};

/// Embedded single-file store backed by SQLite.
///
/// One `records` table keyed by `(collection, id)`. All operations are
/// local disk work, so they run inline behind a connection mutex rather
/// than being offloaded to a blocking pool.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    ///
    /// # Postconditions
    /// - The database file and schema exist
    ///
    /// # Errors
    /// - Path is not writable
    /// - File is not a SQLite database
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(storage_err)?;
        Self::from_connection(conn)
    }

    /// Open a transient in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                collection TEXT NOT NULL,
                id         TEXT NOT NULL,
                record     BLOB NOT NULL,
                PRIMARY KEY (collection, id)
            )",
        )
        .map_err(storage_err)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn storage_err(e: rusqlite::Error) -> Error {
    Error::Storage(e.to_string())
}

#[async_trait]
impl VaultStore for SqliteStore {
    async fn get(&self, collection: &str, id: &EntryKey) -> Result<Vec<u8>> {
        let conn = self.conn.lock().unwrap();

        let record: Option<Vec<u8>> = conn
            .query_row(
                "SELECT record FROM records WHERE collection = ?1 AND id = ?2",
                params![collection, id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_err)?;

        record.ok_or_else(|| Error::NotFound(format!("{}/{}", collection, id)))
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Vec<u8>>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare("SELECT record FROM records WHERE collection = ?1 ORDER BY id")
            .map_err(storage_err)?;

        let rows = stmt
            .query_map(params![collection], |row| row.get(0))
            .map_err(storage_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(storage_err)?);
        }
        Ok(records)
    }

    async fn put(&self, collection: &str, id: &EntryKey, record: Vec<u8>) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO records (collection, id, record) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET record = excluded.record",
            params![collection, id.as_str(), record],
        )
        .map_err(storage_err)?;

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &EntryKey) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let affected = conn
            .execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                params![collection, id.as_str()],
            )
            .map_err(storage_err)?;

        if affected == 0 {
            return Err(Error::NotFound(format!("{}/{}", collection, id)));
        }
        Ok(())
    }
}
