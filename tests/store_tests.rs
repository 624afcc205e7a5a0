//! Postgres store tests. Each test gets its own database created from
//! `DATABASE_URL`. They are ignored by default; run them with
//! `cargo test --test store_tests -- --ignored` against a Postgres server.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use qrpass::store::{InsertOutcome, PgSubmissionStore, StoreError, SubmissionStore};

const NEEDS_DB: &str = "needs DATABASE_URL pointing at a Postgres server";

struct TestDb {
    store: PgSubmissionStore,
    admin_url: String,
    db_name: String,
}

fn with_db_name(url: &str, name: &str) -> String {
    url.rsplit_once('/')
        .map(|(base, _)| format!("{base}/{name}"))
        .unwrap_or_else(|| url.to_string())
}

async fn test_db() -> TestDb {
    let _ = dotenvy::dotenv();
    let base_url = std::env::var("DATABASE_URL").expect(NEEDS_DB);

    let db_name = format!("qrpass_test_{}", Uuid::now_v7().simple());
    let admin_url = with_db_name(&base_url, "postgres");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");
    admin_pool.close().await;

    let store = PgSubmissionStore::connect(&with_db_name(&base_url, &db_name), 8)
        .await
        .expect("Failed to open store");

    TestDb {
        store,
        admin_url,
        db_name,
    }
}

async fn cleanup(db: TestDb) {
    db.store.pool().close().await;

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&db.admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!(
        "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
        db.db_name
    ))
    .execute(&admin_pool)
    .await;

    admin_pool.close().await;
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a Postgres server"]
async fn insert_then_duplicate() {
    let db = test_db().await;

    let first = db.store.insert_if_absent("ABC123", Utc::now()).await.unwrap();
    let InsertOutcome::Inserted(row) = first else {
        panic!("expected insert, got {first:?}");
    };
    assert_eq!(row.data, "ABC123");

    let second = db.store.insert_if_absent("ABC123", Utc::now()).await.unwrap();
    assert_eq!(second, InsertOutcome::Duplicate);

    let rows = db.store.list_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, row.id);

    cleanup(db).await;
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a Postgres server"]
async fn payloads_past_the_btree_limit_are_unique() {
    let db = test_db().await;

    for len in [3 * 1024, 12 * 1024] {
        let payload = format!("Surname: {}", "x".repeat(len));

        let first = db.store.insert_if_absent(&payload, Utc::now()).await.unwrap();
        let InsertOutcome::Inserted(row) = first else {
            panic!("{len}: expected insert, got {first:?}");
        };
        assert_eq!(row.data, payload);

        let second = db.store.insert_if_absent(&payload, Utc::now()).await.unwrap();
        assert_eq!(second, InsertOutcome::Duplicate, "{len}");
    }
    assert_eq!(db.store.list_all().await.unwrap().len(), 2);

    cleanup(db).await;
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a Postgres server"]
async fn nul_payload_is_refused_before_the_query() {
    let db = test_db().await;

    let err = db.store.insert_if_absent("A\0B", Utc::now()).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPayload), "{err}");
    assert!(db.store.list_all().await.unwrap().is_empty());

    cleanup(db).await;
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a Postgres server"]
async fn schema_init_is_idempotent() {
    let db = test_db().await;

    db.store.insert_if_absent("keep-me", Utc::now()).await.unwrap();

    let again = PgSubmissionStore::init(db.store.pool().clone())
        .await
        .expect("second init must not fail");
    assert_eq!(again.list_all().await.unwrap().len(), 1);

    cleanup(db).await;
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a Postgres server"]
async fn list_is_newest_first() {
    let db = test_db().await;

    let base = Utc::now();
    db.store.insert_if_absent("old", base - Duration::seconds(10)).await.unwrap();
    db.store.insert_if_absent("new", base).await.unwrap();
    db.store.insert_if_absent("mid", base - Duration::seconds(5)).await.unwrap();

    let data: Vec<String> = db
        .store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.data)
        .collect();
    assert_eq!(data, vec!["new", "mid", "old"]);

    cleanup(db).await;
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a Postgres server"]
async fn clear_removes_everything_and_keeps_ids_fresh() {
    let db = test_db().await;

    let InsertOutcome::Inserted(before) = db.store.insert_if_absent("a", Utc::now()).await.unwrap()
    else {
        panic!("expected insert");
    };
    db.store.insert_if_absent("b", Utc::now()).await.unwrap();

    assert_eq!(db.store.clear_all().await.unwrap(), 2);
    assert!(db.store.list_all().await.unwrap().is_empty());

    let InsertOutcome::Inserted(after) = db.store.insert_if_absent("a", Utc::now()).await.unwrap()
    else {
        panic!("cleared payload should be new again");
    };
    assert!(after.id > before.id);

    cleanup(db).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs DATABASE_URL pointing at a Postgres server"]
async fn concurrent_inserts_of_same_payload() {
    let db = test_db().await;
    let store = Arc::new(db.store.clone());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .insert_if_absent("RACE", Utc::now())
                    .await
                    .unwrap()
                    .inserted()
            })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);
    assert_eq!(store.list_all().await.unwrap().len(), 1);

    drop(store);
    cleanup(db).await;
}
