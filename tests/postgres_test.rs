//! PostgreSQL backend tests
//!
//! Run with a scratch database:
//! `DATABASE_URL=postgres://... cargo test --test postgres_test -- --ignored --test-threads=1`

use chrono::Utc;
use estate_crm::prelude::*;

async fn setup() -> EstateCrm {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let config = AppConfig {
        database: DatabaseConfig {
            auto_migrate: false,
            ..DatabaseConfig::postgres(database_url)
        },
        ..AppConfig::default()
    };
    let crm = EstateCrm::connect(config)
        .await
        .expect("Failed to connect to database");

    crm.auto_migrate::<Client>(true).await.expect("Failed to migrate clients");
    crm.auto_migrate::<Transaction>(true)
        .await
        .expect("Failed to migrate transactions");
    crm
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_seed_then_page_clients() {
    let crm = setup().await;
    let store = &crm.stores().clients;

    let inserted = store.ensure_seed(Client::seed_records(Utc::now())).await.unwrap();
    assert_eq!(inserted, 5);
    assert_eq!(store.ensure_seed(Client::seed_records(Utc::now())).await.unwrap(), 0);

    let first = store.list(&PageRequest::first(3)).await.unwrap();
    let ids: Vec<&str> = first.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["cli-1", "cli-2", "cli-3"]);

    let cursor = Cursor::decode(first.next.as_deref().unwrap()).unwrap();
    let second = store.list(&PageRequest::first(3).after(cursor)).await.unwrap();
    let ids: Vec<&str> = second.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["cli-4", "cli-5"]);
    assert!(second.next.is_none());
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_patch_and_delete() {
    let crm = setup().await;
    let store = &crm.stores().transactions;
    store.ensure_seed(Transaction::seed_records(Utc::now())).await.unwrap();

    let patch = TransactionPatch {
        description: Some("Commission, 456 Oak Ave".to_string()),
        ..Default::default()
    };
    let updated = store.update("trn-1", &patch).await.unwrap().unwrap();
    assert_eq!(updated.description, "Commission, 456 Oak Ave");
    assert_eq!(updated.kind, TransactionKind::Income);
    assert_eq!(updated.amount, 36_000.0);
    assert!(updated.updated_at > updated.created_at);

    assert!(store.update("missing", &patch).await.unwrap().is_none());
    assert!(store.delete("trn-1").await.unwrap());
    assert!(!store.delete("trn-1").await.unwrap());
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn test_duplicate_id_is_a_conflict() {
    let crm = setup().await;
    let store = &crm.stores().clients;
    let record = Client::seed_records(Utc::now()).remove(0);

    store.create(record.clone()).await.unwrap();
    let err = store.create(record).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}
