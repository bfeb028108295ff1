//! Client entity - a registered OAuth2 client application.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered OAuth2 client.
///
/// `id` is globally unique; storage rejects a second registration under the
/// same id instead of overwriting. The secret and redirect URI are stored
/// opaquely — validation belongs to the protocol engine, not this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,

    /// Opaque credential, stored as supplied.
    pub secret: String,

    pub redirect_uri: String,

    /// Optional caller-defined payload, persisted as serialized JSON text.
    /// `None` round-trips as absent, never as an empty value.
    pub user_data: Option<Value>,
}

impl Client {
    /// Create a new client with no user-data payload.
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            redirect_uri: redirect_uri.into(),
            user_data: None,
        }
    }

    /// Attach a user-data payload.
    pub fn with_user_data(mut self, user_data: Value) -> Self {
        self.user_data = Some(user_data);
        self
    }
}
