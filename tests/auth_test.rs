use std::sync::Arc;

use flamesblue::auth::{token, AccessGuard, Authenticator, Role, TokenCodec};
use flamesblue::error::HrisError;
use flamesblue::seed::seed_users;
use flamesblue::storage::{
    filter_eq, CredentialStore, DocumentCredentialStore, DocumentStore, MemoryDocumentStore,
};
use serde_json::{json, Value};

async fn seeded() -> (Arc<MemoryDocumentStore>, Authenticator, AccessGuard) {
    let store = Arc::new(MemoryDocumentStore::new());
    let credentials: Arc<dyn CredentialStore> = Arc::new(DocumentCredentialStore::new(store.clone()));
    seed_users(store.as_ref(), credentials.as_ref()).await.unwrap();

    let codec = TokenCodec::unsigned();
    let authenticator = Authenticator::new(credentials.clone(), codec.clone());
    let guard = AccessGuard::new(credentials, codec);
    (store, authenticator, guard)
}

#[tokio::test]
async fn test_admin_scenario() {
    let (_, authenticator, guard) = seeded().await;

    let outcome = authenticator.login("admin", "admin").await.unwrap();
    let context = guard
        .authenticate(Some(format!("Bearer {}", outcome.token).as_str()))
        .await
        .unwrap();

    assert_eq!(context.identity, "admin");
    assert_eq!(context.role, Role::Admin);
    assert!(guard.require_role(&context, Role::Admin).await.is_ok());
    assert_eq!(
        guard.require_role(&context, Role::Employee).await,
        Err(HrisError::Forbidden)
    );
}

#[tokio::test]
async fn test_login_token_authenticates_as_same_account() {
    let (_, authenticator, guard) = seeded().await;

    let outcome = authenticator.login("karyawan", "karyawan").await.unwrap();
    assert_eq!(outcome.role, Role::Employee);
    assert_eq!(outcome.name, "Karyawan");

    let context = guard.authenticate(Some(outcome.token.as_str())).await.unwrap();
    assert_eq!(context.identity, "karyawan");
    assert_eq!(context.role, Role::Employee);
    assert_eq!(context.name, "Karyawan");
}

#[tokio::test]
async fn test_only_last_header_segment_is_the_token() {
    let (_, authenticator, guard) = seeded().await;
    let outcome = authenticator.login("admin", "admin").await.unwrap();

    let header = format!("Bearer junk {}", outcome.token);
    assert!(guard.authenticate(Some(header.as_str())).await.is_ok());

    let header = format!("Bearer {} junk", outcome.token);
    assert_eq!(
        guard.authenticate(Some(header.as_str())).await,
        Err(HrisError::InvalidToken)
    );
}

#[tokio::test]
async fn test_inactive_account_cannot_log_in() {
    let (store, authenticator, _) = seeded().await;
    store
        .insert(
            "user",
            json!({"email": "former", "password": "pw", "role": "employee", "is_active": false})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(authenticator.login("former", "pw").await, Err(HrisError::AccountInactive));
    assert_eq!(authenticator.login("former", "x").await, Err(HrisError::InvalidCredentials));
    assert_eq!(authenticator.login("ghost", "pw").await, Err(HrisError::InvalidCredentials));
}

#[tokio::test]
async fn test_active_flag_rules_differ_between_login_and_guard() {
    let (store, authenticator, guard) = seeded().await;
    for record in [
        json!({"email": "legacy", "password": "pw", "role": "employee"}),
        json!({"email": "nulled", "password": "pw", "role": "employee", "is_active": null}),
    ] {
        store
            .insert("user", record.as_object().cloned().unwrap())
            .await
            .unwrap();
    }

    // Without a flag login succeeds, yet the token is not honoured
    let outcome = authenticator.login("legacy", "pw").await.unwrap();
    assert_eq!(
        guard.authenticate(Some(outcome.token.as_str())).await,
        Err(HrisError::Unauthorized)
    );

    assert_eq!(authenticator.login("nulled", "pw").await, Err(HrisError::AccountInactive));
    let token = token::encode("employee", "nulled");
    assert_eq!(
        guard.authenticate(Some(token.as_str())).await,
        Err(HrisError::Unauthorized)
    );
}

#[tokio::test]
async fn test_unknown_stored_role_is_a_storage_error() {
    let (store, authenticator, guard) = seeded().await;
    store
        .insert(
            "user",
            json!({"email": "odd", "password": "pw", "role": "manager", "is_active": true})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(matches!(
        authenticator.login("odd", "pw").await,
        Err(HrisError::StorageError(_))
    ));

    let token = token::encode("employee", "odd");
    assert!(matches!(
        guard.authenticate(Some(token.as_str())).await,
        Err(HrisError::StorageError(_))
    ));
}

#[tokio::test]
async fn test_deactivated_account_loses_access_on_next_request() {
    let (store, authenticator, guard) = seeded().await;
    let outcome = authenticator.login("karyawan", "karyawan").await.unwrap();
    assert!(guard.authenticate(Some(outcome.token.as_str())).await.is_ok());

    store
        .update_one("user", &filter_eq("email", "karyawan"), |doc| {
            doc.insert("is_active".to_string(), Value::Bool(false));
        })
        .await
        .unwrap();

    assert!(token::decode(&outcome.token).is_ok());
    assert_eq!(
        guard.authenticate(Some(outcome.token.as_str())).await,
        Err(HrisError::Unauthorized)
    );
}

#[tokio::test]
async fn test_forged_unsigned_token_is_accepted_for_existing_account() {
    let (_, _, guard) = seeded().await;

    // Unsigned tokens carry no proof of origin
    let forged = token::encode("admin", "karyawan");
    let context = guard.authenticate(Some(forged.as_str())).await.unwrap();
    assert_eq!(context.role, Role::Admin);
    assert_eq!(context.identity, "karyawan");
}

#[tokio::test]
async fn test_signed_codec_blocks_forgery() {
    let store = Arc::new(MemoryDocumentStore::new());
    let credentials: Arc<dyn CredentialStore> = Arc::new(DocumentCredentialStore::new(store.clone()));
    seed_users(store.as_ref(), credentials.as_ref()).await.unwrap();

    let codec = TokenCodec::signed("an-example-signing-secret-of-32+chars");
    let authenticator = Authenticator::new(credentials.clone(), codec.clone());
    let guard = AccessGuard::new(credentials, codec);

    let outcome = authenticator.login("karyawan", "karyawan").await.unwrap();
    assert!(guard.authenticate(Some(outcome.token.as_str())).await.is_ok());

    let forged = token::encode("admin", "karyawan");
    assert_eq!(
        guard.authenticate(Some(forged.as_str())).await,
        Err(HrisError::InvalidToken)
    );
}
