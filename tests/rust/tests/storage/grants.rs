//! Authorization grant tests

use authstore_core::AuthStorage;
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::db::test_storage;
use tests::fixtures;

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let (storage, _db) = test_storage();

    let client = fixtures::test_client("c1");
    storage.set_client(&client).await.unwrap();

    let grant = fixtures::test_grant("g1", client).with_user_data(json!(["aud:one", "aud:two"]));
    storage.save_authorization_grant(&grant).await.unwrap();

    let loaded = storage.load_authorization_grant("g1").await.unwrap();
    assert_eq!(loaded.code, "g1");
    assert_eq!(loaded.expires_in, 3600);
    assert_eq!(loaded.scope, "read");
    assert_eq!(loaded.redirect_uri, "http://localhost/callback");
    assert_eq!(loaded.state, "antiforgery");
    assert_eq!(loaded.user_data, Some(json!(["aud:one", "aud:two"])));

    // Owning client is resolved on load
    assert_eq!(loaded.client.id, "c1");
    assert_eq!(loaded.client.secret, "testsecret");

    // Second granularity is preserved; sub-second jitter is tolerated
    assert_eq!(loaded.created_at.timestamp(), grant.created_at.timestamp());
}

#[tokio::test]
async fn test_duplicate_code_is_conflict() {
    let (storage, _db) = test_storage();

    let client = fixtures::test_client("c1");
    storage.set_client(&client).await.unwrap();

    storage
        .save_authorization_grant(&fixtures::test_grant("g1", client.clone()))
        .await
        .unwrap();

    let err = storage
        .save_authorization_grant(&fixtures::test_grant("g1", client))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_save_with_unregistered_client_is_invalid_reference() {
    let (storage, _db) = test_storage();

    // Client never registered
    let grant = fixtures::test_grant("g1", fixtures::test_client("ghost"));
    let err = storage.save_authorization_grant(&grant).await.unwrap_err();
    assert!(matches!(
        err,
        authstore_core::StoreError::InvalidReference { .. }
    ));
}

#[tokio::test]
async fn test_load_missing_is_not_found() {
    let (storage, _db) = test_storage();

    let err = storage
        .load_authorization_grant("no-such-code")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_then_load_is_not_found() {
    let (storage, _db) = test_storage();

    let client = fixtures::test_client("c1");
    storage.set_client(&client).await.unwrap();
    storage
        .save_authorization_grant(&fixtures::test_grant("g1", client))
        .await
        .unwrap();

    storage.remove_authorization_grant("g1").await.unwrap();
    assert!(storage
        .load_authorization_grant("g1")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_remove_missing_is_not_found() {
    let (storage, _db) = test_storage();

    let err = storage
        .remove_authorization_grant("no-such-code")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_grant_referenced_by_token_is_rejected() {
    let (storage, _db) = test_storage();

    let client = fixtures::test_client("c1");
    storage.set_client(&client).await.unwrap();

    let grant = fixtures::test_grant("g1", client.clone());
    storage.save_authorization_grant(&grant).await.unwrap();

    let token = fixtures::test_token("t1", "r1", client).with_grant(grant);
    storage.save_access_token(&token).await.unwrap();

    let err = storage
        .remove_authorization_grant("g1")
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // Removable again once the dependent token is gone
    storage.remove_access_token("t1").await.unwrap();
    storage.remove_authorization_grant("g1").await.unwrap();
}
