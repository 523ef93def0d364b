//! Single-endpoint provider adapter (archetype: ProxyMesh).
//!
//! `fetch(n)` always returns exactly one `ProxyItem` describing the
//! statically configured endpoint, regardless of `n`, as long as the
//! source is active. `release` deactivates the source; a separate
//! `reactivate()` restores it — used by tests/ops, not by the core.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use socker_core::error::{Error, Result};
use socker_core::{Endpoint, ProxyItem, ProxySource, Scheme};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct ProxyMeshConfig {
    pub tag: String,
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub struct ProxyMeshSource {
    config: ProxyMeshConfig,
    active: AtomicBool,
}

impl ProxyMeshSource {
    pub fn new(config: ProxyMeshConfig) -> Self {
        Self {
            config,
            active: AtomicBool::new(true),
        }
    }

    /// Restores the source after a `release()` deactivated it.
    pub fn reactivate(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn item(&self) -> ProxyItem {
        let mut endpoint = Endpoint::new(&self.config.host, self.config.port, self.config.scheme);
        endpoint.username = self.config.username.clone();
        endpoint.password = self.config.password.clone();
        ProxyItem::new(
            format!("{}-{}-{}", self.config.tag, self.config.host, self.config.port),
            self.config.tag.clone(),
            endpoint,
        )
    }
}

#[async_trait]
impl ProxySource for ProxyMeshSource {
    fn tag(&self) -> &str {
        &self.config.tag
    }

    #[instrument(skip(self), fields(tag = %self.config.tag))]
    async fn fetch(&self, _count: usize) -> Result<Vec<ProxyItem>> {
        if !self.is_active() {
            return Err(Error::source_fetch(&self.config.tag, "source is inactive"));
        }
        debug!("serving the shared static endpoint");
        Ok(vec![self.item()])
    }

    fn supports_release(&self) -> bool {
        true
    }

    async fn release(&self, _id: &str) -> Result<()> {
        self.active.store(false, Ordering::Release);
        Ok(())
    }
}
