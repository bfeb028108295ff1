//! AuthorizationGrant entity - a single-use authorization code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Client;

/// A short-lived authorization code awaiting exchange for an access token.
///
/// Grants always carry a resolved owning [`Client`]; a load never returns a
/// grant whose client could not be found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationGrant {
    /// The authorization code. Unique; single-use by protocol convention.
    pub code: String,

    /// Lifetime in seconds from `created_at`.
    pub expires_in: i64,

    pub scope: String,

    pub redirect_uri: String,

    /// Anti-forgery state token echoed back to the client.
    pub state: String,

    pub created_at: DateTime<Utc>,

    /// Owning client, resolved on load.
    pub client: Client,

    /// Optional caller-defined payload.
    pub user_data: Option<Value>,
}

impl AuthorizationGrant {
    /// Create a new grant issued now, with empty scope and state.
    pub fn new(
        code: impl Into<String>,
        client: Client,
        redirect_uri: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            code: code.into(),
            expires_in,
            scope: String::new(),
            redirect_uri: redirect_uri.into(),
            state: String::new(),
            created_at: Utc::now(),
            client,
            user_data: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_user_data(mut self, user_data: Value) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// Instant at which the grant stops being exchangeable.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.expires_in)
    }

    /// Check whether the grant has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at() < Utc::now()
    }
}
