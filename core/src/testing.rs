//! In-memory `ProxySource` test doubles, used by this crate's own
//! tests and exported (behind the `testing` feature) for downstream
//! crates exercising the pool core without real vendor calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::types::{Endpoint, ProxyItem, Scheme};

/// Always fails `fetch`, never implements `release`.
pub struct FailingSource {
    tag: String,
}

impl FailingSource {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

#[async_trait]
impl crate::source::ProxySource for FailingSource {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn fetch(&self, _count: usize) -> Result<Vec<ProxyItem>> {
        Err(Error::source_fetch(&self.tag, "source unreachable"))
    }
}

/// Yields up to `available` synthetic items per `fetch`, counting each
/// call so tests can assert on call counts. Supports `release`.
pub struct StaticSource {
    tag: String,
    available: usize,
    next_id: AtomicUsize,
    fetch_calls: AtomicUsize,
    released: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new(tag: impl Into<String>, available: usize) -> Self {
        Self {
            tag: tag.into(),
            available,
            next_id: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            released: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn released_ids(&self) -> Vec<String> {
        self.released.lock().clone()
    }
}

#[async_trait]
impl crate::source::ProxySource for StaticSource {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn fetch(&self, count: usize) -> Result<Vec<ProxyItem>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let n = count.min(self.available);
        let items = (0..n)
            .map(|_| {
                let idx = self.next_id.fetch_add(1, Ordering::SeqCst);
                let endpoint = Endpoint::new("127.0.0.1", 10000 + idx as u16, Scheme::Http);
                ProxyItem::new(format!("{}-{idx}", self.tag), self.tag.clone(), endpoint)
            })
            .collect();
        Ok(items)
    }

    fn supports_release(&self) -> bool {
        true
    }

    async fn release(&self, id: &str) -> Result<()> {
        self.released.lock().push(id.to_string());
        Ok(())
    }
}

/// Succeeds on its first `fetch` call (for initialization), then fails
/// every subsequent call — useful for exercising background-refill
/// failure without affecting `init()`.
pub struct DepletingSource {
    tag: String,
    available: usize,
    calls: AtomicUsize,
}

impl DepletingSource {
    pub fn new(tag: impl Into<String>, available: usize) -> Self {
        Self {
            tag: tag.into(),
            available,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl crate::source::ProxySource for DepletingSource {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn fetch(&self, count: usize) -> Result<Vec<ProxyItem>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call > 0 {
            return Err(Error::source_fetch(&self.tag, "exhausted"));
        }
        let n = count.min(self.available);
        let items = (0..n)
            .map(|idx| {
                let endpoint = Endpoint::new("127.0.0.1", 20000 + idx as u16, Scheme::Http);
                ProxyItem::new(format!("{}-{idx}", self.tag), self.tag.clone(), endpoint)
            })
            .collect();
        Ok(items)
    }
}

/// Always fails `release`, used to test that release failures surface
/// as events without failing the caller.
pub struct ReleaseFailingSource {
    inner: StaticSource,
}

impl ReleaseFailingSource {
    pub fn new(tag: impl Into<String>, available: usize) -> Self {
        Self {
            inner: StaticSource::new(tag, available),
        }
    }
}

#[async_trait]
impl crate::source::ProxySource for ReleaseFailingSource {
    fn tag(&self) -> &str {
        self.inner.tag()
    }

    async fn fetch(&self, count: usize) -> Result<Vec<ProxyItem>> {
        self.inner.fetch(count).await
    }

    fn supports_release(&self) -> bool {
        true
    }

    async fn release(&self, _id: &str) -> Result<()> {
        Err(Error::source_release(self.inner.tag(), "vendor rejected release"))
    }
}
