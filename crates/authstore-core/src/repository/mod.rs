//! Storage contract for OAuth2 authorization artifacts
//!
//! The trait defines the interface the protocol engine calls during
//! authorization-code issuance, code-for-token exchange, refresh-token
//! exchange, and revocation, without specifying the implementation
//! (SQLite lives in `authstore-storage`).

use async_trait::async_trait;

use crate::domain::{AccessToken, AuthorizationGrant, Client};
use crate::error::StoreResult;

/// Which access-token column a lookup keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKey {
    /// Look up by the access-token value.
    Access,
    /// Look up by the paired refresh-token value.
    Refresh,
}

impl TokenKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::Access => "access_token",
            TokenKey::Refresh => "refresh_token",
        }
    }
}

/// Persistence facade for clients, authorization grants, and access tokens.
///
/// Semantics shared by all operations:
/// - keyed lookups fail with `StoreError::NotFound` when no row matches —
///   absence is a failure, never a null result;
/// - inserts are insert-only (`StoreError::Conflict` on a duplicate key, the
///   existing row is untouched);
/// - writes referencing a missing row fail with
///   `StoreError::InvalidReference`;
/// - removals of rows still referenced by dependents fail with
///   `StoreError::Conflict` (restrict, never cascade);
/// - every operation is a bounded number of sequential storage round-trips,
///   each awaited separately, so dropping the future cancels the remaining
///   steps.
#[async_trait]
pub trait AuthStorage: Send + Sync {
    /// Register a client. The id must be non-empty and unused.
    async fn set_client(&self, client: &Client) -> StoreResult<()>;

    /// Fetch a client by id.
    async fn get_client(&self, id: &str) -> StoreResult<Client>;

    /// Remove a client. Rejected while grants or tokens still reference it.
    async fn remove_client(&self, id: &str) -> StoreResult<()>;

    /// Persist an authorization grant. The grant's client must already be
    /// registered.
    async fn save_authorization_grant(&self, grant: &AuthorizationGrant) -> StoreResult<()>;

    /// Fetch a grant by code, with its owning client resolved.
    async fn load_authorization_grant(&self, code: &str) -> StoreResult<AuthorizationGrant>;

    /// Remove a grant by code. Rejected while an access token still
    /// references it.
    async fn remove_authorization_grant(&self, code: &str) -> StoreResult<()>;

    /// Persist an access token. The token must carry a resolved client; the
    /// grant and previous-token references, when present, must point at
    /// existing rows.
    async fn save_access_token(&self, token: &AccessToken) -> StoreResult<()>;

    /// Fetch an access token by access- or refresh-token value, resolving
    /// its client, its originating grant (with that grant's client), and —
    /// when the token came from a refresh rotation — its immediate
    /// predecessor as a flat record.
    ///
    /// Chain resolution is bounded to depth 1: the predecessor's own
    /// `client`, `grant`, and `previous` fields are left absent, so a load
    /// costs at most two token-row fetches however long the provenance
    /// chain is. Callers needing the full chain repeat the load on the
    /// predecessor's token value.
    async fn load_access_token(&self, key: &str, kind: TokenKey) -> StoreResult<AccessToken>;

    /// Remove a token by access-token value. Rejected while a successor
    /// token still references it.
    async fn remove_access_token(&self, token: &str) -> StoreResult<()>;

    /// Remove a token by refresh-token value. Same restrictions as
    /// [`remove_access_token`](Self::remove_access_token).
    async fn remove_access_token_by_refresh(&self, refresh_token: &str) -> StoreResult<()>;
}
