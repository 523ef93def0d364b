//! E2 / property 6: ordered source fallback on `replenish`.

use std::sync::Arc;

use socker_core::testing::{FailingSource, StaticSource};
use socker_core::{EventBus, ProxySource, Socker};

#[tokio::test]
async fn fallback_stops_at_first_source_with_items_and_skips_the_rest() {
    let events = Arc::new(EventBus::new(16));
    let mut rx = events.subscribe();

    let s1: Arc<dyn ProxySource> = Arc::new(FailingSource::new("s1"));
    let s2 = Arc::new(StaticSource::new("s2", 3));
    let s3 = Arc::new(StaticSource::new("s3", 9));

    let socker = Socker::new(
        vec![s1, s2.clone() as Arc<dyn ProxySource>, s3.clone() as Arc<dyn ProxySource>],
        events,
    );

    let items = socker.replenish(3).await.expect("s2 should serve the batch");
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.source == "s2"));

    // s1 failed, so exactly one source.failed event was emitted.
    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind(), "source.failed");

    // s3 was never consulted because s2 already yielded a batch.
    assert_eq!(s2.fetch_calls(), 1);
    assert_eq!(s3.fetch_calls(), 0);
}

#[tokio::test]
async fn empty_batch_counts_as_failure_and_advances_to_the_next_source() {
    let events = Arc::new(EventBus::new(16));
    let empty = Arc::new(StaticSource::new("empty", 0));
    let fallback = Arc::new(StaticSource::new("fallback", 2));

    let socker = Socker::new(
        vec![
            empty.clone() as Arc<dyn ProxySource>,
            fallback.clone() as Arc<dyn ProxySource>,
        ],
        events,
    );

    let items = socker.replenish(2).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.source == "fallback"));
}
