use super::*;

#[tokio::test]
async fn sqlite_store_round_trips_a_value() {
    let store = SqliteKeyValueStore::new("sqlite::memory:").await.expect("db");
    assert_eq!(store.get("@nickname").await.expect("get"), None);

    store.set("@nickname", "Ann").await.expect("set");
    assert_eq!(
        store.get("@nickname").await.expect("get"),
        Some("Ann".to_string())
    );
}

#[tokio::test]
async fn sqlite_set_overwrites_existing_value() {
    let store = SqliteKeyValueStore::new("sqlite::memory:").await.expect("db");
    store.set("@nickname", "Ann").await.expect("first");
    store.set("@nickname", "Bea").await.expect("second");

    assert_eq!(
        store.get("@nickname").await.expect("get"),
        Some("Bea".to_string())
    );
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_entries")
        .fetch_one(store.pool())
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sqlite_delete_is_idempotent() {
    let store = SqliteKeyValueStore::new("sqlite::memory:").await.expect("db");
    store.set("@nickname", "Ann").await.expect("set");

    store.delete("@nickname").await.expect("first delete");
    store.delete("@nickname").await.expect("second delete");
    assert_eq!(store.get("@nickname").await.expect("get"), None);
}

#[tokio::test]
async fn sqlite_tracks_last_write_time() {
    let store = SqliteKeyValueStore::new("sqlite::memory:").await.expect("db");
    assert_eq!(store.updated_at("@nickname").await.expect("missing"), None);

    let before = Utc::now();
    store.set("@nickname", "Ann").await.expect("set");
    let updated_at = store
        .updated_at("@nickname")
        .await
        .expect("updated_at")
        .expect("present");
    assert!(updated_at >= before - chrono::Duration::seconds(1));
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let store = SqliteKeyValueStore::new("sqlite::memory:").await.expect("db");
    store.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("nickname.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let store = SqliteKeyValueStore::new(&database_url).await.expect("db");
    store.pool().close().await;

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn memory_store_supports_get_set_delete() {
    let store = MemoryKeyValueStore::new();
    assert!(store.is_empty().await);

    store.set("@nickname", "Ann").await.expect("set");
    assert_eq!(store.len().await, 1);
    assert_eq!(
        store.get("@nickname").await.expect("get"),
        Some("Ann".to_string())
    );

    store.delete("@nickname").await.expect("delete");
    store.delete("@nickname").await.expect("delete missing");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn arc_wrapped_store_delegates() {
    let store = std::sync::Arc::new(MemoryKeyValueStore::with_entry("@nickname", "Ann"));
    let shared: std::sync::Arc<dyn KeyValueStore> = store.clone();

    assert_eq!(
        shared.get("@nickname").await.expect("get"),
        Some("Ann".to_string())
    );
    shared.delete("@nickname").await.expect("delete");
    assert!(store.is_empty().await);
}

#[test]
fn memory_database_has_no_filesystem_path() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/nickname.db?mode=rwc"),
        Some(PathBuf::from("./data/nickname.db"))
    );
}
