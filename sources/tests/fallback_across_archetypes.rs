//! Exercises orchestrator fallback across the two reference
//! archetypes: an exhausted single-endpoint source falls through to
//! a healthy one of the same kind.

use std::sync::Arc;

use socker_core::{EventBus, ProxySource, Socker};
use socker_sources::{ProxyMeshConfig, ProxyMeshSource};

#[tokio::test]
async fn inactive_proxymesh_falls_back_to_the_next_proxymesh_account() {
    let primary = Arc::new(ProxyMeshSource::new(ProxyMeshConfig {
        tag: "proxymesh-primary".to_string(),
        host: "us-wa.proxymesh.com".to_string(),
        port: 31280,
        scheme: socker_core::Scheme::Http,
        username: Some("alice".to_string()),
        password: Some("secret".to_string()),
    }));
    // Deactivate before use to simulate an exhausted/banned account.
    primary.release("n/a").await.unwrap();

    let secondary = Arc::new(ProxyMeshSource::new(ProxyMeshConfig {
        tag: "proxymesh-secondary".to_string(),
        host: "de-fra.proxymesh.com".to_string(),
        port: 31280,
        scheme: socker_core::Scheme::Http,
        username: Some("bob".to_string()),
        password: Some("hunter2".to_string()),
    }));

    let events = Arc::new(EventBus::new(16));
    let mut rx = events.subscribe();
    let socker = Socker::new(
        vec![
            primary.clone() as Arc<dyn ProxySource>,
            secondary.clone() as Arc<dyn ProxySource>,
        ],
        events,
    );

    let items = socker.replenish(1).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].source, "proxymesh-secondary");

    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind(), "source.failed");
}
