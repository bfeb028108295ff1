//! SQLite implementation of the AuthStorage facade.
//!
//! One repository covers the three artifact tables:
//! - Registered clients
//! - Authorization grants (single-use codes, exchanged for tokens)
//! - Access/refresh token pairs, chained backwards through refresh rotation
//!
//! Uniqueness and referential integrity are enforced by the schema (primary
//! keys, UNIQUE refresh_token, FK RESTRICT on delete); this layer's job is
//! classifying the resulting SQLite failures into the `StoreError` taxonomy
//! and keeping access-token loads bounded to one level of chain resolution.

use std::sync::Arc;

use async_trait::async_trait;
use authstore_core::{
    AccessToken, AuthStorage, AuthorizationGrant, Client, StoreError, StoreResult, TokenKey,
};
use rusqlite::{params, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::codec::{
    encode_timestamp, encode_user_data, RawClientRow, RawGrantRow, RawTokenRow, TokenRefs,
};
use crate::Database;

/// Which statement kind a constraint violation came from; the same SQLite
/// foreign-key error code means "missing parent" on insert and "dependents
/// still exist" on delete.
enum Constraint {
    Unique,
    ForeignKey,
}

fn constraint_kind(err: &rusqlite::Error) -> Option<Constraint> {
    if let rusqlite::Error::SqliteFailure(failure, _) = err {
        match failure.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                Some(Constraint::Unique)
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
            _ => None,
        }
    } else {
        None
    }
}

/// Classify an INSERT failure.
fn insert_error(entity: &'static str, key: &str, err: rusqlite::Error) -> StoreError {
    match constraint_kind(&err) {
        Some(Constraint::Unique) => StoreError::conflict(entity, key),
        Some(Constraint::ForeignKey) => StoreError::invalid_reference(entity, key),
        None => StoreError::storage(format!("inserting {} {}", entity, key), err),
    }
}

/// Classify a DELETE failure. A foreign-key violation here means dependent
/// rows still reference the target.
fn delete_error(entity: &'static str, key: &str, err: rusqlite::Error) -> StoreError {
    match constraint_kind(&err) {
        Some(_) => StoreError::conflict(entity, key),
        None => StoreError::storage(format!("removing {} {}", entity, key), err),
    }
}

/// Wrap a read failure with its operation context.
fn query_error(context: impl Into<String>, err: rusqlite::Error) -> StoreError {
    StoreError::storage(context, err)
}

/// SQLite-backed implementation of [`AuthStorage`].
///
/// Holds a shared database handle; every storage round-trip acquires the
/// lock, runs one point query or statement, and releases it, so composite
/// loads can be cancelled between steps by dropping the future.
pub struct SqliteAuthStorage {
    db: Arc<Mutex<Database>>,
}

impl SqliteAuthStorage {
    /// Create a new storage facade over an opened database.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Standard column list for client SELECT queries.
    const CLIENT_COLUMNS: &'static str = "id, secret, redirect_uri, user_data";

    /// Standard column list for grant SELECT queries.
    const GRANT_COLUMNS: &'static str =
        "code, expires_in, scope, redirect_uri, state, created_at, user_data, client_id";

    /// Standard column list for token SELECT queries.
    const TOKEN_COLUMNS: &'static str =
        "access_token, refresh_token, expires_in, scope, redirect_uri, created_at, user_data, \
         client_id, grant_code, previous_token";

    /// Fetch a single access-token row by the chosen key column, decoded
    /// flat. The caller decides which of the returned refs to resolve.
    ///
    /// More than one match would be an integrity violation; the first row
    /// wins.
    async fn fetch_token_row(
        &self,
        key: &str,
        kind: TokenKey,
    ) -> StoreResult<Option<(AccessToken, TokenRefs)>> {
        let context = || format!("loading access token by {}", kind.as_str());

        let raw = {
            let db = self.db.lock().await;
            let conn = db.connection();

            let sql = match kind {
                TokenKey::Access => format!(
                    "SELECT {} FROM access_tokens WHERE access_token = ?1 LIMIT 1",
                    Self::TOKEN_COLUMNS
                ),
                TokenKey::Refresh => format!(
                    "SELECT {} FROM access_tokens WHERE refresh_token = ?1 LIMIT 1",
                    Self::TOKEN_COLUMNS
                ),
            };

            let mut stmt = conn.prepare(&sql).map_err(|e| query_error(context(), e))?;
            stmt.query_row(params![key], RawTokenRow::extract)
                .optional()
                .map_err(|e| query_error(context(), e))?
        };

        raw.map(RawTokenRow::decode).transpose()
    }
}

#[async_trait]
impl AuthStorage for SqliteAuthStorage {
    // =========================================================================
    // Client Operations
    // =========================================================================

    async fn set_client(&self, client: &Client) -> StoreResult<()> {
        // An empty id would create a row no lookup should ever reach.
        if client.id.is_empty() {
            return Err(StoreError::Storage {
                context: "registering client".into(),
                source: "client id must be non-empty".into(),
            });
        }

        let user_data = encode_user_data(client.user_data.as_ref())?;

        let db = self.db.lock().await;
        let conn = db.connection();

        conn.execute(
            "INSERT INTO clients (id, secret, redirect_uri, user_data) VALUES (?1, ?2, ?3, ?4)",
            params![client.id, client.secret, client.redirect_uri, user_data],
        )
        .map_err(|e| insert_error("client", &client.id, e))?;

        debug!("Registered client: {}", client.id);
        Ok(())
    }

    async fn get_client(&self, id: &str) -> StoreResult<Client> {
        let raw = {
            let db = self.db.lock().await;
            let conn = db.connection();

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM clients WHERE id = ?1",
                    Self::CLIENT_COLUMNS
                ))
                .map_err(|e| query_error("loading client", e))?;

            stmt.query_row(params![id], RawClientRow::extract)
                .optional()
                .map_err(|e| query_error("loading client", e))?
        };

        match raw {
            Some(row) => row.decode(),
            None => Err(StoreError::not_found("client", id)),
        }
    }

    async fn remove_client(&self, id: &str) -> StoreResult<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let affected = conn
            .execute("DELETE FROM clients WHERE id = ?1", params![id])
            .map_err(|e| delete_error("client", id, e))?;

        if affected == 0 {
            return Err(StoreError::not_found("client", id));
        }

        info!("Removed client: {}", id);
        Ok(())
    }

    // =========================================================================
    // Authorization Grant Operations
    // =========================================================================

    async fn save_authorization_grant(&self, grant: &AuthorizationGrant) -> StoreResult<()> {
        let user_data = encode_user_data(grant.user_data.as_ref())?;

        let db = self.db.lock().await;
        let conn = db.connection();

        conn.execute(
            "INSERT INTO authorization_grants
                (code, expires_in, scope, redirect_uri, state, created_at, user_data, client_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                grant.code,
                grant.expires_in,
                grant.scope,
                grant.redirect_uri,
                grant.state,
                encode_timestamp(&grant.created_at),
                user_data,
                grant.client.id,
            ],
        )
        .map_err(|e| insert_error("authorization grant", &grant.code, e))?;

        debug!(
            "Saved authorization grant {} for client {}",
            grant.code, grant.client.id
        );
        Ok(())
    }

    async fn load_authorization_grant(&self, code: &str) -> StoreResult<AuthorizationGrant> {
        let raw = {
            let db = self.db.lock().await;
            let conn = db.connection();

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM authorization_grants WHERE code = ?1",
                    Self::GRANT_COLUMNS
                ))
                .map_err(|e| query_error("loading authorization grant", e))?;

            stmt.query_row(params![code], RawGrantRow::extract)
                .optional()
                .map_err(|e| query_error("loading authorization grant", e))?
        };

        let raw = match raw {
            Some(row) => row,
            None => return Err(StoreError::not_found("authorization grant", code)),
        };

        // Grants always come back with their owning client resolved.
        let client = self.get_client(&raw.client_id).await?;
        raw.decode(client)
    }

    async fn remove_authorization_grant(&self, code: &str) -> StoreResult<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let affected = conn
            .execute(
                "DELETE FROM authorization_grants WHERE code = ?1",
                params![code],
            )
            .map_err(|e| delete_error("authorization grant", code, e))?;

        if affected == 0 {
            return Err(StoreError::not_found("authorization grant", code));
        }

        debug!("Removed authorization grant: {}", code);
        Ok(())
    }

    // =========================================================================
    // Access Token Operations
    // =========================================================================

    async fn save_access_token(&self, token: &AccessToken) -> StoreResult<()> {
        // Saving requires a resolved client; a flat predecessor record from
        // a depth-1 load is not a valid input here.
        let client_id = token
            .client
            .as_ref()
            .map(|client| client.id.as_str())
            .ok_or_else(|| StoreError::invalid_reference("access token", &token.token))?;

        let grant_code = token.grant.as_ref().map(|grant| grant.code.as_str());
        let previous_token = token.previous.as_ref().map(|prev| prev.token.as_str());
        let user_data = encode_user_data(token.user_data.as_ref())?;

        let db = self.db.lock().await;
        let conn = db.connection();

        conn.execute(
            "INSERT INTO access_tokens
                (access_token, refresh_token, expires_in, scope, redirect_uri, created_at,
                 user_data, client_id, grant_code, previous_token)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                token.token,
                token.refresh_token,
                token.expires_in,
                token.scope,
                token.redirect_uri,
                encode_timestamp(&token.created_at),
                user_data,
                client_id,
                grant_code,
                previous_token,
            ],
        )
        .map_err(|e| insert_error("access token", &token.token, e))?;

        debug!("Saved access token for client {}", client_id);
        Ok(())
    }

    async fn load_access_token(&self, key: &str, kind: TokenKey) -> StoreResult<AccessToken> {
        let (mut token, refs) = self
            .fetch_token_row(key, kind)
            .await?
            .ok_or_else(|| StoreError::not_found("access token", key))?;

        // A token whose client cannot be resolved is inconsistent state; the
        // lookup failure propagates as the overall failure.
        let client = self.get_client(&refs.client_id).await?;

        let grant = match refs.grant_code {
            Some(code) => Some(self.load_authorization_grant(&code).await?),
            None => None,
        };

        // Depth-1 chain resolution: the predecessor comes back flat, however
        // long the rotation chain behind it. Callers walk the chain by
        // re-loading the predecessor's token value.
        let previous = match refs.previous_token {
            Some(prev_key) => {
                let (prev, _) = self
                    .fetch_token_row(&prev_key, TokenKey::Access)
                    .await?
                    .ok_or_else(|| StoreError::not_found("access token", prev_key.as_str()))?;
                Some(Box::new(prev))
            }
            None => None,
        };

        token.client = Some(client);
        token.grant = grant;
        token.previous = previous;

        debug!("Loaded access token by {}", kind.as_str());
        Ok(token)
    }

    async fn remove_access_token(&self, token: &str) -> StoreResult<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let affected = conn
            .execute(
                "DELETE FROM access_tokens WHERE access_token = ?1",
                params![token],
            )
            .map_err(|e| delete_error("access token", token, e))?;

        if affected == 0 {
            return Err(StoreError::not_found("access token", token));
        }

        debug!("Removed access token");
        Ok(())
    }

    async fn remove_access_token_by_refresh(&self, refresh_token: &str) -> StoreResult<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let affected = conn
            .execute(
                "DELETE FROM access_tokens WHERE refresh_token = ?1",
                params![refresh_token],
            )
            .map_err(|e| delete_error("access token", refresh_token, e))?;

        if affected == 0 {
            return Err(StoreError::not_found("access token", refresh_token));
        }

        debug!("Removed access token by refresh token");
        Ok(())
    }
}
