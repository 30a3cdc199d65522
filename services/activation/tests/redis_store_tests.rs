//! Redis store tests. Skipped unless `ACTIVATION_TEST_REDIS_URL` points at a
//! Redis 6.2+ server whose data may be modified.

use std::sync::Arc;

use activation_service::binding::{BindOutcome, Binding, BindingStore, RedisBindingStore};
use chrono::{Duration, Utc};
use uuid::Uuid;

async fn store() -> Option<RedisBindingStore> {
    let url = std::env::var("ACTIVATION_TEST_REDIS_URL").ok()?;
    Some(RedisBindingStore::connect(&url).await.unwrap())
}

fn unique_code() -> String {
    format!("TEST-{}", Uuid::new_v4())
}

#[tokio::test]
async fn test_bind_if_absent_round() {
    let Some(store) = store().await else { return };
    let code = unique_code();
    let now = Utc::now();
    let first = Binding::new("dev-a", now, now + Duration::minutes(5));
    let second = Binding::new("dev-b", now, now + Duration::minutes(5));

    assert_eq!(store.bind_if_absent(&code, &first).await.unwrap(), BindOutcome::Bound);

    let outcome = store.bind_if_absent(&code, &second).await.unwrap();
    let BindOutcome::Existing(existing) = outcome else {
        panic!("expected existing binding");
    };
    assert_eq!(existing.device_id, "dev-a");
    assert_eq!(existing.expires_at.timestamp_millis(), first.expires_at.timestamp_millis());

    assert!(store.delete(&code).await.unwrap());
    assert!(!store.delete(&code).await.unwrap());
    assert!(store.get(&code).await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_then_expire_at_past_removes_key() {
    let Some(store) = store().await else { return };
    let code = unique_code();
    let now = Utc::now();

    store
        .set(&code, &Binding::new("dev-a", now, now + Duration::minutes(1)))
        .await
        .unwrap();
    assert!(store.get(&code).await.unwrap().is_some());

    store.expire_at(&code, now - Duration::seconds(5)).await.unwrap();
    assert!(store.get(&code).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_binds_single_winner() {
    let Some(store) = store().await else { return };
    let store = Arc::new(store);
    let code = unique_code();
    let now = Utc::now();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            let code = code.clone();
            let binding = Binding::new(format!("dev-{i}"), now, now + Duration::minutes(5));
            tokio::spawn(async move { store.bind_if_absent(&code, &binding).await.unwrap() })
        })
        .collect();

    let mut bound = 0;
    for handle in handles {
        if handle.await.unwrap() == BindOutcome::Bound {
            bound += 1;
        }
    }
    assert_eq!(bound, 1);
    store.delete(&code).await.unwrap();
}
