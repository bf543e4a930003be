//! Integration Tests for the Cache Store
//!
//! Drives the public API through the demo scenarios and concurrent access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use tokio::time::sleep;
use tokio_test::{assert_err, assert_ok};
use ttl_cache::{CacheError, CacheStore, DEFAULT_EXPIRATION, NO_EXPIRATION};

// == Helper Functions ==

const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

fn create_test_store() -> CacheStore<String> {
    CacheStore::new(DEFAULT_TTL, SWEEP_INTERVAL).unwrap()
}

// == Scenario Tests ==

#[tokio::test(start_paused = true)]
async fn test_walkthrough_set_add_overwrite_expire() {
    let cache = create_test_store();

    // Entry with a 5s TTL is still live after 2s
    cache.set("k1", "qwertyuiop".to_string(), Duration::from_secs(5));
    sleep(Duration::from_secs(2)).await;
    assert_eq!(cache.get("k1"), Some("qwertyuiop".to_string()));

    // Add on a present key is refused and leaves the value alone
    let err = assert_err!(cache.add("k1", "dummy".to_string(), DEFAULT_EXPIRATION));
    assert_eq!(err, CacheError::AlreadyExists("k1".to_string()));
    assert_eq!(cache.get("k1"), Some("qwertyuiop".to_string()));

    // Set overwrites value and TTL
    cache.set("k1", "dummy dummy".to_string(), Duration::from_secs(1));
    assert_eq!(cache.get("k1"), Some("dummy dummy".to_string()));

    // Past both the TTL and a sweep interval: hidden and physically gone
    sleep(Duration::from_secs(3)).await;
    assert_eq!(cache.get("k1"), None);
    assert_eq!(cache.len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_expiration_survives_sweeps() {
    let cache = create_test_store();

    cache.set("k2", "x".to_string(), NO_EXPIRATION);
    sleep(SWEEP_INTERVAL * 10).await;

    assert_eq!(cache.get("k2"), Some("x".to_string()));
    assert_eq!(cache.ttl("k2"), Some(None));
    assert!(cache.stats().sweeps >= 9);
}

#[tokio::test(start_paused = true)]
async fn test_default_expiration_uses_store_ttl() {
    let cache = create_test_store();

    assert_ok!(cache.add("k3", "v".to_string(), DEFAULT_EXPIRATION));
    sleep(DEFAULT_TTL - SWEEP_INTERVAL).await;
    assert!(cache.contains_key("k3"));

    sleep(SWEEP_INTERVAL * 3).await;
    assert!(!cache.contains_key("k3"));
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stopped_sweeper_leaves_expired_entries() {
    let cache = create_test_store();
    cache.stop_sweeper();
    cache.join_sweeper().await;

    cache.set("k1", "v".to_string(), Duration::from_secs(1));
    sleep(Duration::from_secs(5)).await;

    assert_eq!(cache.get("k1"), None);
    assert_eq!(cache.len(), 1);

    // Manual sweeps still work
    assert_eq!(cache.delete_expired(), 1);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_values_of_any_type() {
    let cache: CacheStore<Arc<Vec<u8>>> = CacheStore::new(DEFAULT_TTL, SWEEP_INTERVAL).unwrap();
    let payload = Arc::new(vec![1u8, 2, 3]);

    cache.set("bytes", Arc::clone(&payload), NO_EXPIRATION);
    let fetched = cache.get("bytes").unwrap();

    assert!(Arc::ptr_eq(&fetched, &payload));
}

// == Concurrency Tests ==

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_readers_and_writers() {
    let cache: Arc<CacheStore<usize>> =
        Arc::new(CacheStore::new(DEFAULT_TTL, Duration::from_millis(10)).unwrap());
    let threads = 8;
    let per_thread = 200;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..per_thread {
                    let key = format!("t{t}-{i}");
                    cache.set(key.clone(), i, NO_EXPIRATION);
                    assert_eq!(cache.get(&key), Some(i));
                    // Shared key read by everyone
                    let _ = cache.get("shared");
                    if i % 2 == 0 {
                        cache.delete(&key);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), threads * per_thread / 2);
    for t in 0..threads {
        assert_eq!(cache.get(&format!("t{t}-1")), Some(1));
        assert_eq!(cache.get(&format!("t{t}-0")), None);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_add_has_single_winner() {
    let cache: Arc<CacheStore<usize>> =
        Arc::new(CacheStore::new(DEFAULT_TTL, SWEEP_INTERVAL).unwrap());
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let winners = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            let winners = Arc::clone(&winners);
            thread::spawn(move || {
                barrier.wait();
                if cache.add("contended", t, NO_EXPIRATION).is_ok() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("contended").is_some());
}
