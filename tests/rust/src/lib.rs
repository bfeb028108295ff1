//! Shared test utilities and fixtures for Authstore integration tests.

pub use authstore_core::{AccessToken, AuthStorage, AuthorizationGrant, Client, TokenKey};

/// Database test helpers
pub mod db {
    use std::sync::Arc;

    use authstore_storage::{Database, SqliteAuthStorage};
    use tokio::sync::Mutex;

    /// An in-memory database with the schema applied.
    pub struct TestDatabase {
        pub db: Database,
    }

    impl TestDatabase {
        pub fn new() -> Self {
            Self {
                db: Database::open_in_memory().expect("Failed to open in-memory database"),
            }
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Storage facade over a fresh in-memory database, plus the shared
    /// handle for tests that poke at raw rows.
    pub fn test_storage() -> (SqliteAuthStorage, Arc<Mutex<Database>>) {
        let db = Arc::new(Mutex::new(TestDatabase::new().db));
        (SqliteAuthStorage::new(db.clone()), db)
    }
}

/// Entity fixtures
pub mod fixtures {
    use authstore_core::{AccessToken, AuthorizationGrant, Client};
    use uuid::Uuid;

    /// A unique key with a readable prefix, for tests sharing a database.
    pub fn unique_key(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }

    pub fn test_client(id: &str) -> Client {
        Client::new(id, "testsecret", "http://localhost/callback")
    }

    pub fn test_grant(code: &str, client: Client) -> AuthorizationGrant {
        AuthorizationGrant::new(code, client, "http://localhost/callback", 3600)
            .with_scope("read")
            .with_state("antiforgery")
    }

    pub fn test_token(token: &str, refresh_token: &str, client: Client) -> AccessToken {
        AccessToken::new(token, refresh_token, client, "http://localhost/callback", 3600)
            .with_scope("read")
    }
}

/// Initialize tracing output for a test run. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}
