use crate::errors::PromptError;
use std::fmt::{self, Debug};
use tracing::info;
use turso::Database;

pub mod sql;

/// A provider for interacting with a local SQLite database using Turso.
///
/// This provider holds a `Database` instance, which manages a connection
/// pool. When cloned, it shares the same underlying database, allowing for
/// concurrent and shared access to the same database file or in-memory
/// instance.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// # Arguments
    ///
    /// * `db_path`: The path to the SQLite database file. Use ":memory:" for
    ///   a unique, isolated in-memory database. To share an in-memory
    ///   database across multiple `SqliteProvider` instances (e.g., in
    ///   tests), create one provider and then `.clone()` it.
    pub async fn new(db_path: &str) -> Result<Self, PromptError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;

        // WAL mode helps file-based databases under concurrent access; it is
        // a no-op for in-memory databases.
        let conn = db
            .connect()
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
        // Use `query` for PRAGMA statements that return a value to avoid "unexpected row" errors.
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;

        Ok(Self { db })
    }

    /// Ensures that all required application tables and indexes exist.
    /// This function is idempotent and safe to call on every application startup.
    pub async fn initialize_schema(&self) -> Result<(), PromptError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;

        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ())
                .await
                .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        }
        info!("Database schema is up to date.");
        Ok(())
    }

    /// A helper for tests to pre-populate data by executing multiple SQL statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), PromptError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;

        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ())
                .await
                .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}
