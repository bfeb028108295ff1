//! AccessToken entity - an access/refresh token pair with provenance links.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AuthorizationGrant, Client};

/// An issued access token and its paired refresh token.
///
/// Tokens minted by refresh rotation link back to the token they replaced via
/// `previous`, forming a backward chain. Loads resolve that chain to depth 1
/// only: the predecessor comes back flat, with `client`, `grant`, and
/// `previous` all absent. Callers that need the full provenance chain walk it
/// by re-loading the predecessor's token value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The access token value. Unique.
    pub token: String,

    /// The paired refresh token value. Unique; usable as an alternate
    /// lookup key.
    pub refresh_token: String,

    /// Lifetime in seconds from `created_at`.
    pub expires_in: i64,

    pub scope: String,

    pub redirect_uri: String,

    pub created_at: DateTime<Utc>,

    /// Optional caller-defined payload.
    pub user_data: Option<Value>,

    /// Owning client. Required on save; absent only on the flat predecessor
    /// returned by a depth-1 load.
    pub client: Option<Client>,

    /// Originating authorization grant, when the token came from a
    /// code-for-token exchange.
    pub grant: Option<AuthorizationGrant>,

    /// The token this one replaced via refresh rotation. A back-reference
    /// for audit and refresh-reuse detection, never ownership: removing a
    /// token does not remove its successor.
    pub previous: Option<Box<AccessToken>>,
}

impl AccessToken {
    /// Create a new token issued now, with empty scope and no relationships
    /// beyond the owning client.
    pub fn new(
        token: impl Into<String>,
        refresh_token: impl Into<String>,
        client: Client,
        redirect_uri: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            token: token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            scope: String::new(),
            redirect_uri: redirect_uri.into(),
            created_at: Utc::now(),
            user_data: None,
            client: Some(client),
            grant: None,
            previous: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_user_data(mut self, user_data: Value) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// Record the grant this token was exchanged from.
    pub fn with_grant(mut self, grant: AuthorizationGrant) -> Self {
        self.grant = Some(grant);
        self
    }

    /// Record the token this one replaces (refresh rotation).
    pub fn with_previous(mut self, previous: AccessToken) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// Instant at which the access token stops being valid.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.expires_in)
    }

    /// Check whether the access token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at() < Utc::now()
    }
}
