//! Row-level codec between domain entities and SQLite rows.
//!
//! Raw row structs mirror the column order of the SELECT statements in the
//! repository; `extract` pulls them off a `rusqlite::Row`, `decode` turns
//! them into domain entities. Relationship columns stay raw key strings at
//! this layer — resolving them into entities is the repository's job.
//!
//! Two sentinel contracts live here and nowhere else:
//! - user-data payloads: empty string ⇔ absent, both directions;
//! - optional foreign keys: NULL (or a legacy empty string) ⇔ absent, and
//!   the sentinel never reaches a domain object.

use authstore_core::{AccessToken, AuthorizationGrant, Client, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Encode an optional payload for storage. Absent encodes as the empty
/// string, per the storage contract.
pub(crate) fn encode_user_data(user_data: Option<&Value>) -> StoreResult<String> {
    match user_data {
        None => Ok(String::new()),
        Some(value) => serde_json::to_string(value).map_err(StoreError::MalformedPayload),
    }
}

/// Decode a stored payload. The empty string is absent, not an empty value;
/// any other undecodable text is a malformed payload.
pub(crate) fn decode_user_data(raw: &str) -> StoreResult<Option<Value>> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw)
        .map(Some)
        .map_err(StoreError::MalformedPayload)
}

/// Encode a timestamp for storage.
pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parse a stored timestamp. Accepts RFC 3339 and the legacy
/// `%Y-%m-%d %H:%M:%S` form; anything else is a corrupt row, not a value to
/// paper over with a default.
pub(crate) fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    Err(StoreError::Storage {
        context: format!("decoding stored timestamp {:?}", raw),
        source: "unrecognized timestamp format".into(),
    })
}

/// Normalize an optional key column: NULL or a legacy empty-string sentinel
/// both mean absent.
pub(crate) fn optional_key(raw: Option<String>) -> Option<String> {
    raw.filter(|key| !key.is_empty())
}

/// Raw `clients` row.
///
/// Column order: id, secret, redirect_uri, user_data
pub(crate) struct RawClientRow {
    pub id: String,
    pub secret: String,
    pub redirect_uri: String,
    pub user_data: String,
}

impl RawClientRow {
    pub fn extract(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            secret: row.get(1)?,
            redirect_uri: row.get(2)?,
            user_data: row.get(3)?,
        })
    }

    pub fn decode(self) -> StoreResult<Client> {
        Ok(Client {
            id: self.id,
            secret: self.secret,
            redirect_uri: self.redirect_uri,
            user_data: decode_user_data(&self.user_data)?,
        })
    }
}

/// Raw `authorization_grants` row.
///
/// Column order: code, expires_in, scope, redirect_uri, state, created_at,
/// user_data, client_id
pub(crate) struct RawGrantRow {
    pub code: String,
    pub expires_in: i64,
    pub scope: String,
    pub redirect_uri: String,
    pub state: String,
    pub created_at: String,
    pub user_data: String,
    pub client_id: String,
}

impl RawGrantRow {
    pub fn extract(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            code: row.get(0)?,
            expires_in: row.get(1)?,
            scope: row.get(2)?,
            redirect_uri: row.get(3)?,
            state: row.get(4)?,
            created_at: row.get(5)?,
            user_data: row.get(6)?,
            client_id: row.get(7)?,
        })
    }

    /// Decode with the already-resolved owning client.
    pub fn decode(self, client: Client) -> StoreResult<AuthorizationGrant> {
        Ok(AuthorizationGrant {
            code: self.code,
            expires_in: self.expires_in,
            scope: self.scope,
            redirect_uri: self.redirect_uri,
            state: self.state,
            created_at: parse_timestamp(&self.created_at)?,
            client,
            user_data: decode_user_data(&self.user_data)?,
        })
    }
}

/// Raw relationship keys carried by an access-token row.
pub(crate) struct TokenRefs {
    pub client_id: String,
    pub grant_code: Option<String>,
    pub previous_token: Option<String>,
}

/// Raw `access_tokens` row.
///
/// Column order: access_token, refresh_token, expires_in, scope,
/// redirect_uri, created_at, user_data, client_id, grant_code,
/// previous_token
pub(crate) struct RawTokenRow {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub scope: String,
    pub redirect_uri: String,
    pub created_at: String,
    pub user_data: String,
    pub client_id: String,
    pub grant_code: Option<String>,
    pub previous_token: Option<String>,
}

impl RawTokenRow {
    pub fn extract(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            access_token: row.get(0)?,
            refresh_token: row.get(1)?,
            expires_in: row.get(2)?,
            scope: row.get(3)?,
            redirect_uri: row.get(4)?,
            created_at: row.get(5)?,
            user_data: row.get(6)?,
            client_id: row.get(7)?,
            grant_code: row.get(8)?,
            previous_token: row.get(9)?,
        })
    }

    /// Decode into a flat token (no relationships resolved) plus the raw
    /// keys the repository resolves afterwards.
    pub fn decode(self) -> StoreResult<(AccessToken, TokenRefs)> {
        let refs = TokenRefs {
            client_id: self.client_id,
            grant_code: optional_key(self.grant_code),
            previous_token: optional_key(self.previous_token),
        };

        let token = AccessToken {
            token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            scope: self.scope,
            redirect_uri: self.redirect_uri,
            created_at: parse_timestamp(&self.created_at)?,
            user_data: decode_user_data(&self.user_data)?,
            client: None,
            grant: None,
            previous: None,
        };

        Ok((token, refs))
    }
}
