//! Storage gateway tests against a live MongoDB.
//!
//! These tests require MONGODB_URI to point at a reachable deployment.
//! Each test works in its own collection and drops nothing else.

use gym_schedule::config::Config;
use gym_schedule::schedule::{MongoScheduleStore, ScheduleFields, ScheduleId, ScheduleStore};

/// Get a test config from environment, with a collection unique to the test.
fn test_config(collection: &str) -> Option<Config> {
    dotenvy::dotenv().ok();

    let uri = std::env::var("MONGODB_URI").ok()?;

    Some(Config {
        mongodb_uri: uri,
        mongodb_database: "gym_test".to_string(),
        mongodb_collection: format!("{}_{}", collection, ScheduleId::new()),
        ..Config::default()
    })
}

fn spin() -> ScheduleFields {
    ScheduleFields {
        title: "Spin".to_string(),
        day: "Wednesday".to_string(),
        date: "2024-06-05".to_string(),
        time: "19:00".to_string(),
    }
}

/// Test that the deployment answers a ping.
#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn test_ping() {
    let config = match test_config("ping") {
        Some(c) => c,
        None => {
            println!("Skipping: MONGODB_URI not set");
            return;
        }
    };

    let store = MongoScheduleStore::connect(&config).await.unwrap();
    let result = store.ping().await;
    assert!(result.is_ok(), "Ping failed: {:?}", result.err());
}

/// Test the full single-document lifecycle.
#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn test_schedule_lifecycle() {
    let config = match test_config("lifecycle") {
        Some(c) => c,
        None => {
            println!("Skipping: MONGODB_URI not set");
            return;
        }
    };

    let store = MongoScheduleStore::connect(&config).await.unwrap();
    assert!(store.find_all().await.unwrap().is_empty());

    let id = store.insert_one(spin()).await.unwrap().inserted_id;
    let all = store.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert!(!all[0].completed);

    let completed = store.set_completed(&id).await.unwrap();
    assert_eq!(completed.matched_count, 1);

    let mut changed = spin();
    changed.title = "Spin Advanced".to_string();
    let updated = store.update_one(&id, changed.clone()).await.unwrap();
    assert_eq!(updated.matched_count, 1);
    assert_eq!(updated.modified_count, 1);

    let record = store.find_all().await.unwrap().remove(0);
    assert_eq!(record.fields(), changed);
    assert!(record.completed);

    assert_eq!(store.delete_one(&id).await.unwrap().deleted_count, 1);
    assert_eq!(store.delete_one(&id).await.unwrap().deleted_count, 0);
}

/// Test that unknown identifiers match nothing.
#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn test_unknown_id_matches_nothing() {
    let config = match test_config("unknown") {
        Some(c) => c,
        None => {
            println!("Skipping: MONGODB_URI not set");
            return;
        }
    };

    let store = MongoScheduleStore::connect(&config).await.unwrap();
    let id = ScheduleId::new();

    assert_eq!(store.update_one(&id, spin()).await.unwrap().matched_count, 0);
    assert_eq!(store.set_completed(&id).await.unwrap().matched_count, 0);
    assert_eq!(store.delete_one(&id).await.unwrap().deleted_count, 0);
}

/// Test that a malformed connection string is rejected before any I/O.
#[tokio::test]
async fn test_malformed_uri_is_rejected() {
    let config = Config {
        mongodb_uri: "mongodb://localhost:notaport".to_string(),
        ..Config::default()
    };

    assert!(MongoScheduleStore::connect(&config).await.is_err());
}
