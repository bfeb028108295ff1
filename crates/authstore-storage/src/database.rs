//! Database handle for SQLite storage.
//!
//! Opening a database applies `schema.sql` idempotently (plain `CREATE TABLE
//! IF NOT EXISTS` DDL — there is no versioned migration system) and enables
//! foreign-key enforcement, which the repositories rely on for their
//! uniqueness and referential-integrity guarantees. Repositories themselves
//! never execute DDL.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Schema DDL bundled into the binary.
const SCHEMA: &str = include_str!("schema.sql");

/// SQLite database wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path.
    ///
    /// If the database doesn't exist, it will be created and the schema
    /// applied.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        // Enable foreign keys
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Set journal mode to WAL for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;

        debug!("Opened database at {:?}", path);

        let db = Self { conn };
        db.apply_schema()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        // Enable foreign keys
        conn.pragma_update(None, "foreign_keys", "ON")?;

        debug!("Opened in-memory database");

        let db = Self { conn };
        db.apply_schema()?;

        Ok(db)
    }

    /// Apply the bundled schema. Safe to run against an existing database.
    fn apply_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .context("Failed to apply database schema")?;
        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
