//! Repository implementations using SQLite.

mod auth_storage;

pub use auth_storage::SqliteAuthStorage;
