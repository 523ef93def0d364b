//! E4/E5/property 9: reject vs discard semantics, plus invariant 3
//! ("every acquisition and discard fails with 'not initialized'").

use std::sync::Arc;
use std::time::Duration;

use socker_core::testing::{ReleaseFailingSource, StaticSource};
use socker_core::{Error, EventBus, ProxyConfig, ProxyConnection, ProxySource, Proxy, Socker};

fn new_pool(available: usize, pool_size: usize) -> (Proxy, Arc<StaticSource>, Arc<EventBus>) {
    let source = Arc::new(StaticSource::new("s1", available));
    let events = Arc::new(EventBus::new(64));
    let orchestrator = Socker::new(vec![source.clone() as Arc<dyn ProxySource>], events.clone());
    let pool = Proxy::new(
        orchestrator,
        events.clone(),
        ProxyConfig {
            pool_size,
            low_water_fraction: 0.0,
        },
    );
    (pool, source, events)
}

#[tokio::test]
async fn e4_reject_removes_locally_without_source_notification() {
    let (pool, source, _events) = new_pool(2, 2);
    pool.init().await.unwrap();

    let in_use = pool.acquire_exclusive().unwrap();
    pool.reject(&in_use).unwrap();

    assert_eq!(pool.stats().size, 1);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(source.released_ids().is_empty());
}

#[tokio::test]
async fn e5_discard_removes_and_dispatches_release_to_every_capable_source() {
    let (pool, source, events) = new_pool(1, 1);
    let mut rx = events.subscribe();
    pool.init().await.unwrap();
    let _ = rx.recv().await.unwrap(); // pool.initialized

    let conn = pool.acquire().unwrap();
    pool.discard(&conn).unwrap();

    assert_eq!(pool.stats().size, 0);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(source.released_ids(), vec![conn.id]);
}

#[tokio::test]
async fn property_9_discard_of_unknown_id_is_local_noop_but_release_still_dispatched() {
    let (pool, source, _events) = new_pool(1, 1);
    pool.init().await.unwrap();

    let phantom = ProxyConnection {
        id: "ghost".to_string(),
        endpoint: socker_core::Endpoint::new("nowhere", 1, socker_core::Scheme::Http),
        classification: None,
        country: None,
    };
    pool.discard(&phantom).unwrap();

    // Nothing in the pool matched, so size is unchanged.
    assert_eq!(pool.stats().size, 1);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(source.released_ids(), vec!["ghost".to_string()]);
}

#[tokio::test]
async fn e5_source_release_failure_surfaces_as_an_event_not_an_error() {
    let source = Arc::new(ReleaseFailingSource::new("flaky", 1));
    let events = Arc::new(EventBus::new(64));
    let mut rx = events.subscribe();
    let orchestrator = Socker::new(vec![source as Arc<dyn ProxySource>], events.clone());
    let pool = Proxy::new(
        orchestrator,
        events,
        ProxyConfig {
            pool_size: 1,
            low_water_fraction: 0.0,
        },
    );
    pool.init().await.unwrap();
    let _ = rx.recv().await.unwrap(); // pool.initialized

    let conn = pool.acquire().unwrap();
    // discard() itself never fails once past the init check, even
    // though the source's release call is guaranteed to error out.
    pool.discard(&conn).unwrap();
    assert_eq!(pool.stats().size, 0);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind(), "proxy.release.failed");
}

#[tokio::test]
async fn invariant_3_reject_and_discard_fail_before_init() {
    let (pool, _source, _events) = new_pool(1, 1);

    let phantom = ProxyConnection {
        id: "ghost".to_string(),
        endpoint: socker_core::Endpoint::new("nowhere", 1, socker_core::Scheme::Http),
        classification: None,
        country: None,
    };

    assert!(matches!(pool.reject(&phantom), Err(Error::NotInitialized)));
    assert!(matches!(pool.discard(&phantom), Err(Error::NotInitialized)));
}
