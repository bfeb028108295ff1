//! # Authstore Core Library
//!
//! Domain entities and the storage contract for OAuth2 authorization
//! artifacts: registered clients, authorization grants, and access/refresh
//! token pairs.
//!
//! ## Modules
//!
//! - `domain` - Core entities (Client, AuthorizationGrant, AccessToken)
//! - `error` - The `StoreError` taxonomy shared by all storage backends
//! - `repository` - The `AuthStorage` data-access trait
//!
//! This crate is storage-agnostic; the SQLite implementation lives in
//! `authstore-storage`.

pub mod domain;
pub mod error;
pub mod repository;

// Re-export commonly used types
pub use domain::*;
pub use error::{StoreError, StoreResult};
pub use repository::{AuthStorage, TokenKey};
