//! Integration tests for the storage module
//!
//! These cover user management and search-history persistence against
//! SQLite. PostgreSQL runs the same suite when DATABASE_URL points at a
//! reachable server:
//! - `DATABASE_BACKEND=sqlite cargo test` - Run only SQLite tests
//! - `DATABASE_BACKEND=postgres cargo test` - Run only PostgreSQL tests
//! - By default, both backends are tested

use std::sync::Arc;
use vane::models::{NewSearchRecord, User};
use vane::storage::{PostgresStorage, SqliteStorage, Storage, StorageError};

/// Get the database backend to test from environment variable
fn should_test_backend(backend: &str) -> bool {
    match std::env::var("DATABASE_BACKEND") {
        Ok(val) => val.to_lowercase() == backend.to_lowercase(),
        Err(_) => true, // Test all backends if not specified
    }
}

/// Helper to create SQLite test storage.
/// Single connection: pooled in-memory SQLite gives every connection its
/// own database.
async fn create_sqlite_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Helper to create PostgreSQL test storage
async fn create_postgres_storage() -> Option<Arc<dyn Storage>> {
    let db_url = std::env::var("DATABASE_URL").ok()?;
    let storage = PostgresStorage::new(&db_url, 5).await.ok()?;
    storage.init().await.ok()?;
    Some(Arc::new(storage))
}

fn test_user(id: &str, username: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$fake".to_string(),
        created_at: 1_700_000_000,
    }
}

fn search(user_id: &str, city: &str, condition: &str, searched_at: i64) -> NewSearchRecord {
    NewSearchRecord {
        user_id: user_id.to_string(),
        city: city.to_string(),
        country: "GB".to_string(),
        searched_at,
        condition: condition.to_string(),
        temperature: 14.5,
        description: "overcast".to_string(),
        period: "5days".to_string(),
    }
}

#[tokio::test]
async fn test_user_lifecycle_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    storage
        .create_user(&test_user("u1", "alice", "alice@example.com"))
        .await
        .unwrap();

    let by_email = storage.user_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.unwrap().username, "alice");

    let by_username = storage.user_by_username("alice").await.unwrap();
    assert_eq!(by_username.unwrap().id, "u1");

    assert!(storage.user_by_email("nobody@example.com").await.unwrap().is_none());

    let users = storage.list_users(10, 0).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_duplicate_user_conflicts_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    storage
        .create_user(&test_user("u1", "alice", "alice@example.com"))
        .await
        .unwrap();

    // Same email, different username
    let err = storage
        .create_user(&test_user("u2", "alice2", "alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    // Same username, different email
    let err = storage
        .create_user(&test_user("u3", "alice", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
}

#[tokio::test]
async fn test_concurrent_registration_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    // Exactly one of several racing registrations for the same username
    // should win; the rest must see Conflict, never a partial insert.
    let storage = create_sqlite_storage().await;

    let mut handles = vec![];
    for i in 0..10 {
        let storage_clone = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage_clone
                .create_user(&test_user(
                    &format!("u{}", i),
                    "same_name",
                    &format!("user{}@example.com", i),
                ))
                .await
        }));
    }

    let mut success_count = 0;
    let mut conflict_count = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => success_count += 1,
            Err(StorageError::Conflict) => conflict_count += 1,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    assert_eq!(success_count, 1, "Exactly one registration should succeed");
    assert_eq!(conflict_count, 9, "All others should get conflict");
}

#[tokio::test]
async fn test_append_search_assigns_ids_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    let first = storage
        .append_search(search("u1", "London", "Clouds", 1000))
        .await
        .unwrap();
    let second = storage
        .append_search(search("u1", "Paris", "Rain", 1001))
        .await
        .unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.city, "London");
    assert_eq!(first.condition, "Clouds");
}

#[tokio::test]
async fn test_history_is_scoped_to_user_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    for i in 0..3 {
        storage
            .append_search(search("u1", "London", "Clouds", 1000 + i))
            .await
            .unwrap();
    }
    storage
        .append_search(search("u2", "Berlin", "Snow", 2000))
        .await
        .unwrap();

    let history = storage.history_for_user("u1").await.unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|r| r.user_id == "u1"));

    let other = storage.history_for_user("u2").await.unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].city, "Berlin");

    let empty = storage.history_for_user("nobody").await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_history_round_trips_all_fields_sqlite() {
    if !should_test_backend("sqlite") {
        return;
    }

    let storage = create_sqlite_storage().await;

    let saved = storage
        .append_search(search("u1", "London", "Clouds", 1234))
        .await
        .unwrap();

    let history = storage.history_for_user("u1").await.unwrap();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.id, saved.id);
    assert_eq!(record.country, "GB");
    assert_eq!(record.searched_at, 1234);
    assert_eq!(record.temperature, 14.5);
    assert_eq!(record.description, "overcast");
    assert_eq!(record.period, "5days");
}

#[tokio::test]
async fn test_user_lifecycle_postgres() {
    if !should_test_backend("postgres") {
        return;
    }
    let Some(storage) = create_postgres_storage().await else {
        return;
    };

    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let username = format!("pg_user_{}", suffix);
    let email = format!("pg_{}@example.com", suffix);

    storage
        .create_user(&test_user(&format!("pg{}", suffix), &username, &email))
        .await
        .unwrap();

    let fetched = storage.user_by_username(&username).await.unwrap();
    assert_eq!(fetched.unwrap().email, email);

    let err = storage
        .create_user(&test_user("other-id", &username, &email))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
}
