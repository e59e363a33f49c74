//! Unit tests for the in-memory code store

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use st_core::services::{CodeStoreTrait, Expiry, ManualTimeSource};

use crate::cache::InMemoryCodeStore;

fn store_with_clock() -> (Arc<ManualTimeSource>, InMemoryCodeStore) {
    let clock = Arc::new(ManualTimeSource::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let store = InMemoryCodeStore::new().with_time_source(clock.clone());
    (clock, store)
}

#[tokio::test]
async fn test_set_and_get() {
    let store = InMemoryCodeStore::new();

    assert_eq!(store.get("555-0100").await.unwrap(), None);
    store.set("555-0100", "a").await.unwrap();
    assert_eq!(store.get("555-0100").await.unwrap(), Some("a".to_string()));
    assert_eq!(store.ttl("555-0100"), None);
}

#[tokio::test]
async fn test_entries_expire() {
    let (clock, store) = store_with_clock();

    store.set_with_expiry("555-0100", "a", 60).await.unwrap();
    assert_eq!(store.ttl("555-0100"), Some(60));

    clock.advance(Duration::seconds(59));
    assert_eq!(store.get("555-0100").await.unwrap(), Some("a".to_string()));

    clock.advance(Duration::seconds(1));
    assert_eq!(store.get("555-0100").await.unwrap(), None);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_set_if_absent() {
    let (clock, store) = store_with_clock();

    assert!(store.set_if_absent("555-0100", "first", 60).await.unwrap());
    assert!(!store.set_if_absent("555-0100", "second", 60).await.unwrap());
    assert_eq!(store.get("555-0100").await.unwrap(), Some("first".to_string()));

    // An expired entry no longer blocks the claim
    clock.advance(Duration::seconds(61));
    assert!(store.set_if_absent("555-0100", "third", 60).await.unwrap());
    assert_eq!(store.get("555-0100").await.unwrap(), Some("third".to_string()));
}

#[tokio::test]
async fn test_compare_and_swap_guards_on_value() {
    let store = InMemoryCodeStore::new();
    store.set_with_expiry("555-0100", "old", 60).await.unwrap();

    assert!(!store
        .compare_and_swap("555-0100", "other", "new", Expiry::Keep)
        .await
        .unwrap());
    assert!(store
        .compare_and_swap("555-0100", "old", "new", Expiry::Keep)
        .await
        .unwrap());
    assert_eq!(store.get("555-0100").await.unwrap(), Some("new".to_string()));

    assert!(!store
        .compare_and_swap("555-0199", "old", "new", Expiry::Keep)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_compare_and_swap_expiry_modes() {
    let (clock, store) = store_with_clock();
    store.set_with_expiry("555-0100", "v1", 100).await.unwrap();
    clock.advance(Duration::seconds(40));

    store
        .compare_and_swap("555-0100", "v1", "v2", Expiry::Keep)
        .await
        .unwrap();
    assert_eq!(store.ttl("555-0100"), Some(60));

    store
        .compare_and_swap("555-0100", "v2", "v3", Expiry::After(100))
        .await
        .unwrap();
    assert_eq!(store.ttl("555-0100"), Some(100));

    store
        .compare_and_swap("555-0100", "v3", "v4", Expiry::Persist)
        .await
        .unwrap();
    assert_eq!(store.ttl("555-0100"), None);

    clock.advance(Duration::days(30));
    assert_eq!(store.get("555-0100").await.unwrap(), Some("v4".to_string()));
}

#[tokio::test]
async fn test_delete_if_equals() {
    let store = InMemoryCodeStore::new();
    store.set("555-0100", "claim").await.unwrap();

    assert!(!store.delete_if_equals("555-0100", "other").await.unwrap());
    assert_eq!(store.len(), 1);

    assert!(store.delete_if_equals("555-0100", "claim").await.unwrap());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_writes_sweep_expired_entries() {
    let (clock, store) = store_with_clock();

    for i in 0..1000 {
        let key = format!("555-{:04}", i);
        assert!(store.set_if_absent(&key, "123456", 60).await.unwrap());
    }
    assert_eq!(store.raw_len(), 1000);

    clock.advance(Duration::seconds(3600));
    assert!(store.set_if_absent("555-9999", "123456", 60).await.unwrap());

    assert_eq!(store.raw_len(), 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_sweep_keeps_live_and_persistent_entries() {
    let (clock, store) = store_with_clock();

    store.set_with_expiry("555-0100", "short", 30).await.unwrap();
    store.set_with_expiry("555-0101", "long", 7200).await.unwrap();
    store.set("555-0102", "forever").await.unwrap();

    clock.advance(Duration::seconds(120));
    store.set_with_expiry("555-0103", "new", 60).await.unwrap();

    assert_eq!(store.raw_len(), 3);
    assert_eq!(store.get("555-0101").await.unwrap(), Some("long".to_string()));
    assert_eq!(store.get("555-0102").await.unwrap(), Some("forever".to_string()));
}

#[tokio::test]
async fn test_key_prefix_is_isolated() {
    let store = InMemoryCodeStore::new().with_prefix("sms");
    store.set("555-0100", "a").await.unwrap();

    assert_eq!(store.get("555-0100").await.unwrap(), Some("a".to_string()));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_concurrent_claims_have_one_winner() {
    let store = Arc::new(InMemoryCodeStore::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .set_if_absent("555-0100", &format!("claim-{}", i), 60)
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
