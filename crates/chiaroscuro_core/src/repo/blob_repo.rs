//! Durable blob repository.
//!
//! # Responsibility
//! - Store and fetch the latest board snapshot under a named key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - One payload per key; saving replaces the previous payload.
//! - A missing key is `Ok(None)`, never an error.
//! - Repositories only accept connections migrated to the latest schema.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BlobResult<T> = Result<T, BlobError>;

#[derive(Debug)]
pub enum BlobError {
    Db(DbError),
    /// Connection was not opened through `db::open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for BlobError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key/value storage for serialized board snapshots.
pub trait BlobStore {
    fn load_blob(&self, key: &str) -> BlobResult<Option<String>>;
    fn save_blob(&self, key: &str, payload: &str) -> BlobResult<()>;
    /// Removes the blob; returns whether one existed.
    fn remove_blob(&self, key: &str) -> BlobResult<bool>;
}

/// SQLite-backed blob store.
pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema is not at the latest version.
    pub fn try_new(conn: &'conn Connection) -> BlobResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(BlobError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn load_blob(&self, key: &str) -> BlobResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM board_blobs WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save_blob(&self, key: &str, payload: &str) -> BlobResult<()> {
        self.conn.execute(
            "INSERT INTO board_blobs (key, payload)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }

    fn remove_blob(&self, key: &str) -> BlobResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM board_blobs WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
