//! Authstore Storage Layer
//!
//! SQLite persistence for OAuth2 authorization artifacts.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Protocol Engine                      │
//! ├──────────────────────────────────────────────────────┤
//! │              AuthStorage trait                       │
//! │              (authstore-core)                        │
//! ├──────────────────────────────────────────────────────┤
//! │              SqliteAuthStorage                       │
//! │   (facade + chain-bounded access-token loader)       │
//! ├──────────────────────────────────────────────────────┤
//! │                Row codec                             │
//! │   (entities ⇄ rows, payload/timestamp handling)      │
//! ├──────────────────────────────────────────────────────┤
//! │                 Database                             │
//! │        (SQLite, FK enforcement, schema)              │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use authstore_storage::{Database, SqliteAuthStorage};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Database::open(&path)?;
//! let db = Arc::new(Mutex::new(db));
//!
//! let storage = SqliteAuthStorage::new(db);
//! ```

mod codec;
mod database;
mod repositories;

pub use database::Database;
pub use repositories::SqliteAuthStorage;

/// Default database file name.
pub const DATABASE_FILE: &str = "authstore.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| p.join("authstore").join(DATABASE_FILE))
}
